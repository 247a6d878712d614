//! Model version identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model version requested for a generation.
///
/// Versions the service adds later can be passed through [`ModelVersion::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelVersion {
    Latest,
    LatestFast,
    Create20250915,
    Edit20250915,
    EditFast20251030,
    Remix20250915,
    RemixFast20251030,
    Other(String),
}

impl ModelVersion {
    pub fn as_str(&self) -> &str {
        match self {
            ModelVersion::Latest => "latest",
            ModelVersion::LatestFast => "latest-fast",
            ModelVersion::Create20250915 => "reve-create@20250915",
            ModelVersion::Edit20250915 => "reve-edit@20250915",
            ModelVersion::EditFast20251030 => "reve-edit-fast@20251030",
            ModelVersion::Remix20250915 => "reve-remix@20250915",
            ModelVersion::RemixFast20251030 => "reve-remix-fast@20251030",
            ModelVersion::Other(version) => version,
        }
    }

    pub fn is_fast(&self) -> bool {
        matches!(
            self,
            ModelVersion::LatestFast
                | ModelVersion::EditFast20251030
                | ModelVersion::RemixFast20251030
        )
    }
}

impl From<String> for ModelVersion {
    fn from(s: String) -> Self {
        match s.as_str() {
            "latest" => ModelVersion::Latest,
            "latest-fast" => ModelVersion::LatestFast,
            "reve-create@20250915" => ModelVersion::Create20250915,
            "reve-edit@20250915" => ModelVersion::Edit20250915,
            "reve-edit-fast@20251030" => ModelVersion::EditFast20251030,
            "reve-remix@20250915" => ModelVersion::Remix20250915,
            "reve-remix-fast@20251030" => ModelVersion::RemixFast20251030,
            _ => ModelVersion::Other(s),
        }
    }
}

impl From<&str> for ModelVersion {
    fn from(s: &str) -> Self {
        ModelVersion::from(s.to_string())
    }
}

impl From<ModelVersion> for String {
    fn from(version: ModelVersion) -> Self {
        match version {
            ModelVersion::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ModelVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ModelVersion::from(s))
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_versions() {
        assert_eq!(ModelVersion::from("latest"), ModelVersion::Latest);
        assert_eq!(
            ModelVersion::from("reve-edit-fast@20251030"),
            ModelVersion::EditFast20251030
        );
        assert_eq!(ModelVersion::Remix20250915.to_string(), "reve-remix@20250915");
    }

    #[test]
    fn test_custom_version_passes_through() {
        let version = ModelVersion::from("reve-create@20260101");
        assert_eq!(version, ModelVersion::Other("reve-create@20260101".into()));
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"reve-create@20260101\"");
        assert!(!version.is_fast());
    }

    #[test]
    fn test_fast_versions() {
        assert!(ModelVersion::LatestFast.is_fast());
        assert!(ModelVersion::EditFast20251030.is_fast());
        assert!(ModelVersion::RemixFast20251030.is_fast());
        assert!(!ModelVersion::Latest.is_fast());
        assert!(!ModelVersion::Create20250915.is_fast());
    }
}
