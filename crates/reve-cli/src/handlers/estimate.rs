//! Estimate command handler

use super::utils::postprocess_steps;
use crate::cli::{EstimateArgs, Operation};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use reve_core::images::{estimate_create, estimate_edit, estimate_remix};
use reve_core::validator;

/// Handle the estimate command. Works offline.
pub async fn handle_estimate(args: EstimateArgs, output: &mut OutputWriter) -> Result<()> {
    validator::validate_scaling(args.scaling).map_err(reve_core::Error::from)?;
    let steps = postprocess_steps(args.upscale, args.remove_background);
    for step in &steps {
        step.validate().map_err(reve_core::Error::from)?;
    }

    if args.fast && args.operation == Operation::Create {
        return Err(Error::invalid_args("--fast applies to edit and remix only"));
    }

    let estimate = match args.operation {
        Operation::Create => estimate_create(args.scaling, &steps),
        Operation::Edit => estimate_edit(args.fast, args.scaling, &steps),
        Operation::Remix => estimate_remix(args.fast, args.scaling, &steps),
    };

    if output.is_json() {
        return output.data(&estimate);
    }

    output.field("base credits", estimate.base_credits)?;
    output.field("scaling", estimate.scaling)?;
    output.field("postprocessing", estimate.postprocess_credits)?;
    output.field("total credits", estimate.total_credits)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(operation: Operation) -> EstimateArgs {
        EstimateArgs {
            operation,
            fast: false,
            scaling: 1.0,
            upscale: None,
            remove_background: false,
        }
    }

    #[tokio::test]
    async fn test_fast_create_is_rejected() {
        let mut output = OutputWriter::with_writer(true, false, false, Box::new(std::io::sink()));
        let result = handle_estimate(
            EstimateArgs {
                fast: true,
                ..args(Operation::Create)
            },
            &mut output,
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidArgs(_))));
    }

    #[tokio::test]
    async fn test_invalid_upscale_factor() {
        let mut output = OutputWriter::with_writer(true, false, false, Box::new(std::io::sink()));
        let result = handle_estimate(
            EstimateArgs {
                upscale: Some(8),
                ..args(Operation::Remix)
            },
            &mut output,
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Core(reve_core::Error::Validation(_)))
        ));
    }
}
