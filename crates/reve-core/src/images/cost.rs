//! Credit cost estimates
//!
//! Estimates are computed locally from published base prices and never
//! contact the service. Actual charges are reported per call in
//! `credits_used`.

use serde::Serialize;

use crate::types::{Postprocess, ProcessType};

pub const CREATE_CREDITS: u64 = 18;
pub const EDIT_CREDITS: u64 = 30;
pub const EDIT_FAST_CREDITS: u64 = 5;
pub const REMIX_CREDITS: u64 = 30;
pub const REMIX_FAST_CREDITS: u64 = 5;
pub const UPSCALE_CREDITS: u64 = 10;
pub const REMOVE_BACKGROUND_CREDITS: u64 = 5;

/// Breakdown of an estimated charge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub base_credits: u64,
    pub scaling: f64,
    pub postprocess_credits: u64,
    pub total_credits: u64,
}

impl CostEstimate {
    fn new(base_credits: u64, scaling: f64, postprocessing: &[Postprocess]) -> Self {
        let scaling = if scaling <= 1.0 { 1.0 } else { scaling };
        let postprocess_credits = postprocessing.iter().map(postprocess_credits).sum();
        let scaled = (base_credits as f64 * scaling).round() as u64;
        Self {
            base_credits,
            scaling,
            postprocess_credits,
            total_credits: scaled + postprocess_credits,
        }
    }
}

fn postprocess_credits(step: &Postprocess) -> u64 {
    match step.process {
        ProcessType::Upscale => UPSCALE_CREDITS,
        ProcessType::RemoveBackground => REMOVE_BACKGROUND_CREDITS,
    }
}

pub fn estimate_create(scaling: f64, postprocessing: &[Postprocess]) -> CostEstimate {
    CostEstimate::new(CREATE_CREDITS, scaling, postprocessing)
}

pub fn estimate_edit(fast: bool, scaling: f64, postprocessing: &[Postprocess]) -> CostEstimate {
    let base = if fast { EDIT_FAST_CREDITS } else { EDIT_CREDITS };
    CostEstimate::new(base, scaling, postprocessing)
}

pub fn estimate_remix(fast: bool, scaling: f64, postprocessing: &[Postprocess]) -> CostEstimate {
    let base = if fast { REMIX_FAST_CREDITS } else { REMIX_CREDITS };
    CostEstimate::new(base, scaling, postprocessing)
}
