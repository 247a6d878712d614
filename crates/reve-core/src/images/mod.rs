//! Image generation service
//!
//! Wraps the create, edit and remix endpoints. Every call validates its
//! parameters first, then goes through the shared retrying transport in
//! either JSON or raw-binary mode.

pub mod batch;
pub mod cost;
pub mod params;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::http::{ApiRequest, CallOptions, HttpTransport};
use crate::types::{ImageResult, OutputFormat, RawImage};

pub use batch::{error_count, errors, success_count, successful, BatchResult};
pub use cost::{estimate_create, estimate_edit, estimate_remix, CostEstimate};
pub use params::{CreateParams, EditParams, RemixParams};

pub const CREATE_PATH: &str = "/v1/image/create";
pub const EDIT_PATH: &str = "/v1/image/edit";
pub const REMIX_PATH: &str = "/v1/image/remix";

/// Default number of concurrent calls in a batch
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Image endpoints bound to one transport
#[derive(Debug, Clone)]
pub struct ImagesService {
    transport: Arc<HttpTransport>,
}

impl ImagesService {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn create(&self, params: &CreateParams) -> Result<ImageResult> {
        self.create_with(params, &CallOptions::default()).await
    }

    pub async fn create_with(
        &self,
        params: &CreateParams,
        options: &CallOptions,
    ) -> Result<ImageResult> {
        params.validate()?;
        self.send_json(CREATE_PATH, params, options).await
    }

    pub async fn create_raw(&self, params: &CreateParams, format: OutputFormat) -> Result<RawImage> {
        self.create_raw_with(params, format, &CallOptions::default()).await
    }

    pub async fn create_raw_with(
        &self,
        params: &CreateParams,
        format: OutputFormat,
        options: &CallOptions,
    ) -> Result<RawImage> {
        params.validate()?;
        self.send_raw(CREATE_PATH, params, format, options).await
    }

    pub async fn edit(&self, params: &EditParams) -> Result<ImageResult> {
        self.edit_with(params, &CallOptions::default()).await
    }

    pub async fn edit_with(&self, params: &EditParams, options: &CallOptions) -> Result<ImageResult> {
        params.validate()?;
        self.send_json(EDIT_PATH, params, options).await
    }

    pub async fn edit_raw(&self, params: &EditParams, format: OutputFormat) -> Result<RawImage> {
        self.edit_raw_with(params, format, &CallOptions::default()).await
    }

    pub async fn edit_raw_with(
        &self,
        params: &EditParams,
        format: OutputFormat,
        options: &CallOptions,
    ) -> Result<RawImage> {
        params.validate()?;
        self.send_raw(EDIT_PATH, params, format, options).await
    }

    pub async fn remix(&self, params: &RemixParams) -> Result<ImageResult> {
        self.remix_with(params, &CallOptions::default()).await
    }

    pub async fn remix_with(
        &self,
        params: &RemixParams,
        options: &CallOptions,
    ) -> Result<ImageResult> {
        params.validate()?;
        self.send_json(REMIX_PATH, params, options).await
    }

    pub async fn remix_raw(&self, params: &RemixParams, format: OutputFormat) -> Result<RawImage> {
        self.remix_raw_with(params, format, &CallOptions::default()).await
    }

    pub async fn remix_raw_with(
        &self,
        params: &RemixParams,
        format: OutputFormat,
        options: &CallOptions,
    ) -> Result<RawImage> {
        params.validate()?;
        self.send_raw(REMIX_PATH, params, format, options).await
    }

    /// Run independent create calls with at most `concurrency` in flight.
    ///
    /// Returns one result per input, in input order. A failing item does not
    /// stop the others.
    pub async fn create_batch(
        &self,
        params: &[CreateParams],
        concurrency: usize,
    ) -> Vec<BatchResult> {
        self.create_batch_with(params, concurrency, &CallOptions::default())
            .await
    }

    /// Batch variant sharing one set of call options across all items
    pub async fn create_batch_with(
        &self,
        params: &[CreateParams],
        concurrency: usize,
        options: &CallOptions,
    ) -> Vec<BatchResult> {
        tracing::debug!(items = params.len(), concurrency, "Starting create batch");

        stream::iter(params.iter().enumerate())
            .map(|(index, item)| async move {
                BatchResult {
                    index,
                    outcome: self.create_with(item, options).await,
                }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn send_json<P: Serialize>(
        &self,
        path: &str,
        params: &P,
        options: &CallOptions,
    ) -> Result<ImageResult> {
        let request = ApiRequest::post(path)
            .with_body(params)
            .with_breadcrumb(options.breadcrumb());
        let response = self.transport.send(&request, options).await?;

        let mut result: ImageResult = serde_json::from_slice(&response.body)?;
        if result.request_id.is_empty() {
            result.request_id = response.request_id;
        }
        Ok(result)
    }

    async fn send_raw<P: Serialize>(
        &self,
        path: &str,
        params: &P,
        format: OutputFormat,
        options: &CallOptions,
    ) -> Result<RawImage> {
        let request = ApiRequest::post(path)
            .with_body(params)
            .with_accept(format.content_type())
            .with_breadcrumb(options.breadcrumb());
        let response = self.transport.send_raw(&request, options).await?;
        Ok(response.into())
    }
}
