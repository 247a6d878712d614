//! Image payloads sent to the API

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Payload {
    Bytes(Vec<u8>),
    Base64(String),
}

/// Image held either as raw bytes or as base64 text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    payload: Payload,
}

impl Image {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Payload::Bytes(data.into()),
        }
    }

    /// Wrap already-encoded base64 text without decoding it
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self {
            payload: Payload::Base64(encoded.into()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Ok(Self::from_bytes(data))
    }

    /// Decoded bytes
    pub fn bytes(&self) -> Result<Vec<u8>> {
        match &self.payload {
            Payload::Bytes(data) if !data.is_empty() => Ok(data.clone()),
            Payload::Base64(encoded) if !encoded.is_empty() => STANDARD
                .decode(encoded)
                .map_err(|e| Error::image("invalid base64 image", e)),
            _ => Err(Error::Image {
                message: "image is empty".to_string(),
                source: None,
            }),
        }
    }

    /// Base64 text as sent on the wire
    pub fn base64(&self) -> String {
        match &self.payload {
            Payload::Bytes(data) => STANDARD.encode(data),
            Payload::Base64(encoded) => encoded.clone(),
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.bytes()?)?;
        Ok(())
    }

    /// Byte size, estimated from the text length for base64 payloads
    pub fn size(&self) -> usize {
        match &self.payload {
            Payload::Bytes(data) => data.len(),
            Payload::Base64(encoded) => encoded.len() * 3 / 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.payload {
            Payload::Bytes(data) => data.is_empty(),
            Payload::Base64(encoded) => encoded.is_empty(),
        }
    }
}

/// Serialized as base64 text, the form the API accepts
impl Serialize for Image {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.base64())
    }
}

/// Tag referring to the `index`-th reference image inside a remix prompt
pub fn image_ref(index: usize) -> String {
    format!("<img>{index}</img>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bytes_and_base64_agree() {
        let image = Image::from_bytes(b"hello".to_vec());
        assert_eq!(image.base64(), "aGVsbG8=");
        assert_eq!(image.size(), 5);

        let decoded = Image::from_base64("aGVsbG8=");
        assert_eq!(decoded.bytes().unwrap(), b"hello");
        assert_eq!(decoded.size(), 6);
    }

    #[test]
    fn test_empty_image() {
        assert!(Image::from_bytes(Vec::new()).bytes().is_err());
        assert!(Image::from_base64("").is_empty());
        assert!(matches!(
            Image::from_base64("not base64!").bytes(),
            Err(Error::Image { .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = Image::from_file(&path).unwrap();
        let out = dir.path().join("out.png");
        image.save_to(&out).unwrap();
        assert_eq!(fs::read(out).unwrap(), vec![0x89, b'P', b'N', b'G']);

        assert!(matches!(
            Image::from_file(dir.path().join("missing.png")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_image_ref() {
        assert_eq!(image_ref(0), "<img>0</img>");
        assert_eq!(image_ref(5), "<img>5</img>");
    }
}
