//! Output formatting and writing utilities

use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

/// Writes command results as human-readable text or JSON
pub struct OutputWriter {
    json: bool,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(json: bool, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(json, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(json: bool, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            json,
            use_color,
            quiet,
            writer,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{content}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.json {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.json {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {message}"))
        }
    }

    /// Write an aligned `label: value` line
    pub fn field(&mut self, label: &str, value: impl std::fmt::Display) -> Result<()> {
        if self.quiet || self.json {
            return Ok(());
        }
        let label = format!("{label:>18}:");
        if self.use_color {
            self.writeln(&format!("{} {}", label.bold(), value))
        } else {
            self.writeln(&format!("{label} {value}"))
        }
    }

    /// Write a value as pretty JSON; only in JSON mode
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if !self.json {
            return Ok(());
        }
        let formatted = serde_json::to_string_pretty(value)?;
        self.writeln(&formatted)
    }
}
