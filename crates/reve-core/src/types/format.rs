//! Response formats

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// Representation requested through the `Accept` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Base64 image inside a JSON document
    #[default]
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    Webp,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// File extension including the dot. JSON results decode to PNG.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => ".jpeg",
            OutputFormat::Webp => ".webp",
            OutputFormat::Png | OutputFormat::Json => ".png",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, OutputFormat::Json)
    }

    /// Pick an image format from a file extension, falling back to PNG
    pub fn detect(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            Some("webp") => OutputFormat::Webp,
            _ => OutputFormat::Png,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    /// Accepts MIME types and short names (`json`, `png`, `jpg`, `jpeg`, `webp`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "application/json" => Ok(OutputFormat::Json),
            "png" | "image/png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" | "image/jpeg" => Ok(OutputFormat::Jpeg),
            "webp" | "image/webp" => Ok(OutputFormat::Webp),
            other => Err(Error::configuration(format!("unknown output format '{other}'"))),
        }
    }
}
