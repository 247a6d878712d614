//! Create, edit and remix command handlers

use super::utils::{build_client, call_options, load_image, output_target, CommonParams};
use crate::cli::{CreateArgs, EditArgs, GenerationArgs, RemixArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use anyhow::Context;
use reve_core::{
    CallOptions, Client, CreateParams, EditParams, ImageResult, OutputFormat, RawImage,
    RemixParams,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Summary printed after a successful generation
#[derive(Debug, Serialize)]
struct GenerationReport {
    path: PathBuf,
    bytes: usize,
    content_type: String,
    version: String,
    request_id: String,
    content_violation: bool,
    credits_used: i64,
    credits_remaining: i64,
}

impl GenerationReport {
    fn from_raw(path: &Path, raw: &RawImage) -> Self {
        Self {
            path: path.to_path_buf(),
            bytes: raw.size(),
            content_type: raw.content_type.clone(),
            version: raw.version.clone(),
            request_id: raw.request_id.clone(),
            content_violation: raw.content_violation,
            credits_used: raw.credits_used,
            credits_remaining: raw.credits_remaining,
        }
    }

    fn from_json(path: &Path, bytes: usize, result: &ImageResult) -> Self {
        Self {
            path: path.to_path_buf(),
            bytes,
            content_type: OutputFormat::Png.content_type().to_string(),
            version: result.version.clone(),
            request_id: result.request_id.clone(),
            content_violation: result.content_violation,
            credits_used: result.credits_used,
            credits_remaining: result.credits_remaining,
        }
    }
}

/// One of the three generation calls, ready to send
enum Generation {
    Create(CreateParams),
    Edit(EditParams),
    Remix(RemixParams),
}

impl Generation {
    async fn json(&self, client: &Client, options: &CallOptions) -> reve_core::Result<ImageResult> {
        let images = client.images();
        match self {
            Generation::Create(params) => images.create_with(params, options).await,
            Generation::Edit(params) => images.edit_with(params, options).await,
            Generation::Remix(params) => images.remix_with(params, options).await,
        }
    }

    async fn raw(
        &self,
        client: &Client,
        format: OutputFormat,
        options: &CallOptions,
    ) -> reve_core::Result<RawImage> {
        let images = client.images();
        match self {
            Generation::Create(params) => images.create_raw_with(params, format, options).await,
            Generation::Edit(params) => images.edit_raw_with(params, format, options).await,
            Generation::Remix(params) => images.remix_raw_with(params, format, options).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Generation::Create(_) => "create",
            Generation::Edit(_) => "edit",
            Generation::Remix(_) => "remix",
        }
    }
}

/// Handle the create command
#[instrument(skip_all)]
pub async fn handle_create(args: CreateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let common = CommonParams::from_args(&args.generation)?;
    let params = CreateParams {
        prompt: args.prompt,
        aspect_ratio: common.aspect_ratio,
        version: common.version,
        test_time_scaling: common.test_time_scaling,
        postprocessing: common.postprocessing,
    };
    run(Generation::Create(params), &args.generation, config, output).await
}

/// Handle the edit command
#[instrument(skip_all, fields(image = %args.image.display()))]
pub async fn handle_edit(args: EditArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let common = CommonParams::from_args(&args.generation)?;
    let params = EditParams {
        edit_instruction: args.instruction,
        reference_image: load_image(&args.image)?,
        aspect_ratio: common.aspect_ratio,
        version: common.version,
        test_time_scaling: common.test_time_scaling,
        postprocessing: common.postprocessing,
    };
    run(Generation::Edit(params), &args.generation, config, output).await
}

/// Handle the remix command
#[instrument(skip_all, fields(images = args.images.len()))]
pub async fn handle_remix(args: RemixArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let common = CommonParams::from_args(&args.generation)?;
    let reference_images = args
        .images
        .iter()
        .map(|path| load_image(path))
        .collect::<Result<Vec<_>>>()?;
    let params = RemixParams {
        prompt: args.prompt,
        reference_images,
        aspect_ratio: common.aspect_ratio,
        version: common.version,
        test_time_scaling: common.test_time_scaling,
        postprocessing: common.postprocessing,
    };
    run(Generation::Remix(params), &args.generation, config, output).await
}

async fn run(
    generation: Generation,
    args: &GenerationArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let (path, format) = output_target(args, generation.name());
    let client = build_client(config)?;
    let options = call_options(args.breadcrumb.as_deref());

    info!(command = generation.name(), format = %format, path = %path.display(), "Sending request");

    let report = if format.is_image() {
        let raw = generation.raw(&client, format, &options).await?;
        write_output(&path, &raw.data)?;
        GenerationReport::from_raw(&path, &raw)
    } else {
        let result = generation.json(&client, &options).await?;
        let bytes = result.bytes()?;
        write_output(&path, &bytes)?;
        GenerationReport::from_json(&path, bytes.len(), &result)
    };

    info!(credits_used = report.credits_used, "Image saved");

    if output.is_json() {
        return output.data(&report);
    }

    output.success(&format!("Saved {}", report.path.display()))?;
    output.field("size", format!("{} bytes", report.bytes))?;
    if !report.version.is_empty() {
        output.field("version", &report.version)?;
    }
    output.field("credits used", report.credits_used)?;
    output.field("credits remaining", report.credits_remaining)?;
    if !report.request_id.is_empty() {
        output.field("request id", &report.request_id)?;
    }
    if report.content_violation {
        output.warning("The service flagged this result for a content policy violation")?;
    }
    Ok(())
}

/// Write the generated image, naming the target path on failure
fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)
        .with_context(|| format!("failed to write image to {}", path.display()))?;
    Ok(())
}
