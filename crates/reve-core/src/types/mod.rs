//! Value types shared by requests and results

pub mod aspect;
pub mod format;
pub mod image;
pub mod postprocess;
pub mod result;
pub mod version;

pub use aspect::AspectRatio;
pub use format::OutputFormat;
pub use image::{image_ref, Image};
pub use postprocess::{Postprocess, ProcessType};
pub use result::{ImageResult, RawImage};
pub use version::ModelVersion;
