//! Shared utilities for command handlers

use crate::cli::GenerationArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use reve_core::{
    validator, AspectRatio, CallOptions, CancellationToken, Client, Image, ModelVersion,
    OutputFormat, Postprocess,
};
use std::path::{Path, PathBuf};

/// Parameter fields shared by create, edit and remix
#[derive(Debug, Default)]
pub struct CommonParams {
    pub aspect_ratio: Option<AspectRatio>,
    pub version: Option<ModelVersion>,
    pub test_time_scaling: Option<f64>,
    pub postprocessing: Vec<Postprocess>,
}

impl CommonParams {
    pub fn from_args(args: &GenerationArgs) -> Result<Self> {
        let aspect_ratio = match args.aspect_ratio.as_deref() {
            Some(ratio) => {
                validator::validate_aspect_ratio(ratio).map_err(reve_core::Error::from)?;
                if ratio.is_empty() {
                    None
                } else {
                    Some(ratio.parse().map_err(reve_core::Error::from)?)
                }
            }
            None => None,
        };

        Ok(Self {
            aspect_ratio,
            version: args.model.as_deref().map(ModelVersion::from),
            test_time_scaling: args.scaling,
            postprocessing: postprocess_steps(args.upscale, args.remove_background),
        })
    }
}

pub fn postprocess_steps(upscale: Option<u32>, remove_background: bool) -> Vec<Postprocess> {
    let mut steps = Vec::new();
    if let Some(factor) = upscale {
        steps.push(Postprocess::upscale(factor));
    }
    if remove_background {
        steps.push(Postprocess::remove_background());
    }
    steps
}

/// Output path and response format for a generation.
///
/// An explicit `--format` wins; otherwise the format follows the output
/// extension. Without `--out` a timestamped file name is generated.
pub fn output_target(args: &GenerationArgs, command: &str) -> (PathBuf, OutputFormat) {
    let format = args
        .format
        .map(OutputFormat::from)
        .or_else(|| args.out.as_deref().map(OutputFormat::detect))
        .unwrap_or(OutputFormat::Png);

    let path = args.out.clone().unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        PathBuf::from(format!("reve-{command}-{stamp}{}", format.extension()))
    });

    (path, format)
}

pub fn load_image(path: &Path) -> Result<Image> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(Image::from_file(path)?)
}

/// Build a client from merged configuration
pub fn build_client(config: &Config) -> Result<Client> {
    let client_config = config.client_config()?;
    tracing::debug!(config = ?client_config, "Resolved client configuration");
    Ok(Client::from_config(client_config)?)
}

/// Call options that abort on Ctrl-C
pub fn call_options(breadcrumb: Option<&str>) -> CallOptions {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    let options = CallOptions::new().with_cancellation(token);
    match breadcrumb {
        Some(breadcrumb) => options.with_breadcrumb(breadcrumb),
        None => options,
    }
}
