//! Parameter validation
//!
//! Every check runs locally before a request descriptor is built, so a
//! rejected call never reaches the network.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::types::AspectRatio;

pub const MAX_PROMPT_LENGTH: usize = 2560;
pub const MAX_REFERENCE_IMAGES: usize = 6;
pub const MIN_SCALING: f64 = 1.0;
pub const MAX_SCALING: f64 = 15.0;

/// Reasons parameters are rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("prompt exceeds 2560 characters")]
    PromptTooLong,

    #[error("edit instruction cannot be empty")]
    EmptyInstruction,

    #[error("reference image cannot be empty")]
    EmptyReferenceImage,

    #[error("at least one reference image required")]
    NoReferenceImages,

    #[error("maximum 6 reference images allowed")]
    TooManyReferenceImages,

    #[error("invalid aspect ratio")]
    InvalidAspectRatio,

    #[error("upscale factor must be 2, 3, or 4")]
    InvalidUpscaleFactor,

    #[error("test time scaling must be 1-15")]
    InvalidScaling,

    #[error("prompt references <img>{index}</img> but only {available} reference images were given")]
    UnknownImageReference { index: usize, available: usize },
}

pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(ValidationError::PromptTooLong);
    }
    Ok(())
}

pub fn validate_instruction(instruction: &str) -> Result<(), ValidationError> {
    if instruction.is_empty() {
        return Err(ValidationError::EmptyInstruction);
    }
    if instruction.chars().count() > MAX_PROMPT_LENGTH {
        return Err(ValidationError::PromptTooLong);
    }
    Ok(())
}

pub fn validate_reference_image(encoded: &str) -> Result<(), ValidationError> {
    if encoded.is_empty() {
        return Err(ValidationError::EmptyReferenceImage);
    }
    Ok(())
}

pub fn validate_reference_count(count: usize) -> Result<(), ValidationError> {
    match count {
        0 => Err(ValidationError::NoReferenceImages),
        n if n > MAX_REFERENCE_IMAGES => Err(ValidationError::TooManyReferenceImages),
        _ => Ok(()),
    }
}

/// Empty text means "let the service choose" and passes
pub fn validate_aspect_ratio(ratio: &str) -> Result<(), ValidationError> {
    if ratio.is_empty() {
        return Ok(());
    }
    ratio.parse::<AspectRatio>().map(|_| ())
}

pub fn validate_upscale_factor(factor: u32) -> Result<(), ValidationError> {
    if !(2..=4).contains(&factor) {
        return Err(ValidationError::InvalidUpscaleFactor);
    }
    Ok(())
}

/// Zero means unset and passes
pub fn validate_scaling(scaling: f64) -> Result<(), ValidationError> {
    if scaling == 0.0 {
        return Ok(());
    }
    if !(MIN_SCALING..=MAX_SCALING).contains(&scaling) {
        return Err(ValidationError::InvalidScaling);
    }
    Ok(())
}

/// Every `<img>N</img>` tag in a remix prompt must name one of the
/// `available` reference images (0-based).
pub fn validate_image_refs(prompt: &str, available: usize) -> Result<(), ValidationError> {
    static IMAGE_REF: OnceLock<Regex> = OnceLock::new();
    let pattern = IMAGE_REF
        .get_or_init(|| Regex::new(r"<img>\s*(\d+)\s*</img>").expect("image reference pattern"));

    for captures in pattern.captures_iter(prompt) {
        let index = captures[1].parse::<usize>().unwrap_or(usize::MAX);
        if index >= available {
            return Err(ValidationError::UnknownImageReference { index, available });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::image_ref;

    #[test]
    fn test_prompt_length_counts_characters() {
        assert_eq!(validate_prompt(""), Err(ValidationError::EmptyPrompt));
        assert!(validate_prompt(&"é".repeat(MAX_PROMPT_LENGTH)).is_ok());
        assert_eq!(
            validate_prompt(&"a".repeat(MAX_PROMPT_LENGTH + 1)),
            Err(ValidationError::PromptTooLong)
        );
    }

    #[test]
    fn test_instruction() {
        assert_eq!(validate_instruction(""), Err(ValidationError::EmptyInstruction));
        assert!(validate_instruction("make the sky purple").is_ok());
    }

    #[test]
    fn test_reference_counts() {
        assert_eq!(validate_reference_count(0), Err(ValidationError::NoReferenceImages));
        assert!(validate_reference_count(1).is_ok());
        assert!(validate_reference_count(6).is_ok());
        assert_eq!(
            validate_reference_count(7),
            Err(ValidationError::TooManyReferenceImages)
        );
        assert_eq!(
            validate_reference_image(""),
            Err(ValidationError::EmptyReferenceImage)
        );
    }

    #[test]
    fn test_aspect_ratio_text() {
        assert!(validate_aspect_ratio("").is_ok());
        assert!(validate_aspect_ratio("3:2").is_ok());
        assert_eq!(
            validate_aspect_ratio("5:4"),
            Err(ValidationError::InvalidAspectRatio)
        );
    }

    #[test]
    fn test_scaling_bounds() {
        assert!(validate_scaling(0.0).is_ok());
        assert!(validate_scaling(1.0).is_ok());
        assert!(validate_scaling(15.0).is_ok());
        assert_eq!(validate_scaling(0.5), Err(ValidationError::InvalidScaling));
        assert_eq!(validate_scaling(15.5), Err(ValidationError::InvalidScaling));
    }

    #[test]
    fn test_image_references() {
        let prompt = format!("put {} into {}", image_ref(0), image_ref(1));
        assert!(validate_image_refs(&prompt, 2).is_ok());
        assert_eq!(
            validate_image_refs(&prompt, 1),
            Err(ValidationError::UnknownImageReference {
                index: 1,
                available: 1
            })
        );
        assert!(validate_image_refs("no tags at all", 1).is_ok());
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::EmptyPrompt.to_string(), "prompt cannot be empty");
        assert_eq!(
            ValidationError::PromptTooLong.to_string(),
            "prompt exceeds 2560 characters"
        );
        assert_eq!(
            ValidationError::TooManyReferenceImages.to_string(),
            "maximum 6 reference images allowed"
        );
    }
}
