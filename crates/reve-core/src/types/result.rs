//! Generation results

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::http::client::RawResponse;

/// Result of a JSON-mode generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Base64-encoded image
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub content_violation: bool,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub credits_used: i64,
    #[serde(default)]
    pub credits_remaining: i64,
}

impl ImageResult {
    pub fn bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.image)
            .map_err(|e| Error::image("invalid base64 image in response", e))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.bytes()?)?;
        Ok(())
    }
}

/// Result of a binary-mode generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub version: String,
    pub content_violation: bool,
    pub request_id: String,
    pub credits_used: i64,
    pub credits_remaining: i64,
}

impl RawImage {
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), &self.data)?;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl From<RawResponse> for RawImage {
    fn from(raw: RawResponse) -> Self {
        Self {
            data: raw.data,
            content_type: raw.content_type,
            version: raw.version,
            content_violation: raw.content_violation,
            request_id: raw.request_id,
            credits_used: raw.credits_used,
            credits_remaining: raw.credits_remaining,
        }
    }
}
