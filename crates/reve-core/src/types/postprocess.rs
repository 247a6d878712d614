//! Postprocessing steps applied after generation

use serde::{Deserialize, Serialize};

use crate::validator::{self, ValidationError};

/// Kind of postprocessing step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    Upscale,
    RemoveBackground,
}

/// One postprocessing step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postprocess {
    pub process: ProcessType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upscale_factor: Option<u32>,
}

impl Postprocess {
    pub fn upscale(factor: u32) -> Self {
        Self {
            process: ProcessType::Upscale,
            upscale_factor: Some(factor),
        }
    }

    pub fn remove_background() -> Self {
        Self {
            process: ProcessType::RemoveBackground,
            upscale_factor: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.process {
            ProcessType::Upscale => validator::validate_upscale_factor(self.upscale_factor.unwrap_or(0)),
            ProcessType::RemoveBackground => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            serde_json::to_value(Postprocess::upscale(2)).unwrap(),
            json!({"process": "upscale", "upscale_factor": 2})
        );
        assert_eq!(
            serde_json::to_value(Postprocess::remove_background()).unwrap(),
            json!({"process": "remove_background"})
        );
    }

    #[test]
    fn test_upscale_bounds() {
        assert!(Postprocess::upscale(2).validate().is_ok());
        assert!(Postprocess::upscale(4).validate().is_ok());
        assert_eq!(
            Postprocess::upscale(5).validate(),
            Err(ValidationError::InvalidUpscaleFactor)
        );
        assert_eq!(
            Postprocess::upscale(1).validate(),
            Err(ValidationError::InvalidUpscaleFactor)
        );
        assert!(Postprocess::remove_background().validate().is_ok());
    }
}
