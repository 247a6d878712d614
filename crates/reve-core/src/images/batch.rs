//! Batch results

use crate::error::{Error, Result};
use crate::types::ImageResult;

/// Outcome of one item in a batch, tagged with its input position
#[derive(Debug)]
pub struct BatchResult {
    pub index: usize,
    pub outcome: Result<ImageResult>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn success_count(results: &[BatchResult]) -> usize {
    results.iter().filter(|r| r.is_ok()).count()
}

pub fn error_count(results: &[BatchResult]) -> usize {
    results.len() - success_count(results)
}

/// Successful results in input order
pub fn successful(results: &[BatchResult]) -> Vec<&ImageResult> {
    results.iter().filter_map(|r| r.outcome.as_ref().ok()).collect()
}

/// Failures in input order
pub fn errors(results: &[BatchResult]) -> Vec<&Error> {
    results.iter().filter_map(|r| r.outcome.as_ref().err()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::ValidationError;

    fn ok(index: usize, image: &str) -> BatchResult {
        BatchResult {
            index,
            outcome: Ok(ImageResult {
                image: image.to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_helpers() {
        let results = vec![
            ok(0, "1"),
            BatchResult {
                index: 1,
                outcome: Err(ValidationError::EmptyPrompt.into()),
            },
            ok(2, "2"),
        ];

        assert_eq!(success_count(&results), 2);
        assert_eq!(error_count(&results), 1);
        let images: Vec<_> = successful(&results).iter().map(|r| r.image.as_str()).collect();
        assert_eq!(images, vec!["1", "2"]);
        assert!(matches!(errors(&results)[..], [Error::Validation(_)]));
    }
}
