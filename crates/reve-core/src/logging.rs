//! Debug logging sink
//!
//! The transport writes one line before and one line after each round trip
//! when debug output is enabled. Where those lines go is a capability
//! injected at client construction.

use std::fmt;
use std::sync::Arc;

/// Destination for debug lines
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// Writes `[reve] <message>` to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[reve] {message}");
    }
}

/// Forwards lines to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::debug!(target: "reve::transport", "{}", message);
    }
}

impl<F> Logger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Shared handle to an injected logger
#[derive(Clone)]
pub struct SharedLogger(Arc<dyn Logger>);

impl SharedLogger {
    pub fn new(logger: impl Logger + 'static) -> Self {
        Self(Arc::new(logger))
    }

    pub fn log(&self, message: &str) {
        self.0.log(message)
    }
}

impl Default for SharedLogger {
    fn default() -> Self {
        Self::new(ConsoleLogger)
    }
}

impl fmt::Debug for SharedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedLogger")
    }
}
