//! Request parameters for the image endpoints

use serde::Serialize;

use crate::types::{AspectRatio, Image, ModelVersion, Postprocess};
use crate::validator::{self, ValidationError};

fn validate_common(
    test_time_scaling: Option<f64>,
    postprocessing: &[Postprocess],
) -> Result<(), ValidationError> {
    if let Some(scaling) = test_time_scaling {
        validator::validate_scaling(scaling)?;
    }
    postprocessing.iter().try_for_each(Postprocess::validate)
}

/// Parameters for generating an image from text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateParams {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ModelVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_time_scaling: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub postprocessing: Vec<Postprocess>,
}

impl CreateParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_version(mut self, version: impl Into<ModelVersion>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_test_time_scaling(mut self, scaling: f64) -> Self {
        self.test_time_scaling = Some(scaling);
        self
    }

    pub fn with_postprocess(mut self, step: Postprocess) -> Self {
        self.postprocessing.push(step);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validator::validate_prompt(&self.prompt)?;
        validate_common(self.test_time_scaling, &self.postprocessing)
    }
}

/// Parameters for editing one image with an instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditParams {
    pub edit_instruction: String,
    pub reference_image: Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ModelVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_time_scaling: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub postprocessing: Vec<Postprocess>,
}

impl EditParams {
    pub fn new(edit_instruction: impl Into<String>, reference_image: Image) -> Self {
        Self {
            edit_instruction: edit_instruction.into(),
            reference_image,
            aspect_ratio: None,
            version: None,
            test_time_scaling: None,
            postprocessing: Vec::new(),
        }
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_version(mut self, version: impl Into<ModelVersion>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_test_time_scaling(mut self, scaling: f64) -> Self {
        self.test_time_scaling = Some(scaling);
        self
    }

    pub fn with_postprocess(mut self, step: Postprocess) -> Self {
        self.postprocessing.push(step);
        self
    }

    /// Whether the requested version is a fast variant
    pub fn is_fast(&self) -> bool {
        self.version.as_ref().is_some_and(ModelVersion::is_fast)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validator::validate_instruction(&self.edit_instruction)?;
        if self.reference_image.is_empty() {
            return Err(ValidationError::EmptyReferenceImage);
        }
        validate_common(self.test_time_scaling, &self.postprocessing)
    }
}

/// Parameters for combining reference images under a prompt.
///
/// The prompt refers to reference images by position with
/// [`image_ref`](crate::types::image_ref) tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemixParams {
    pub prompt: String,
    pub reference_images: Vec<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ModelVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_time_scaling: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub postprocessing: Vec<Postprocess>,
}

impl RemixParams {
    pub fn new(prompt: impl Into<String>, reference_images: Vec<Image>) -> Self {
        Self {
            prompt: prompt.into(),
            reference_images,
            ..Default::default()
        }
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_version(mut self, version: impl Into<ModelVersion>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_test_time_scaling(mut self, scaling: f64) -> Self {
        self.test_time_scaling = Some(scaling);
        self
    }

    pub fn with_postprocess(mut self, step: Postprocess) -> Self {
        self.postprocessing.push(step);
        self
    }

    pub fn is_fast(&self) -> bool {
        self.version.as_ref().is_some_and(ModelVersion::is_fast)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validator::validate_prompt(&self.prompt)?;
        validator::validate_reference_count(self.reference_images.len())?;
        if self.reference_images.iter().any(Image::is_empty) {
            return Err(ValidationError::EmptyReferenceImage);
        }
        validator::validate_image_refs(&self.prompt, self.reference_images.len())?;
        validate_common(self.test_time_scaling, &self.postprocessing)
    }
}
