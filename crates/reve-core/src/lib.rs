//! Reve Core - Typed async client for the Reve image generation API
//!
//! This crate wraps the create, edit and remix endpoints behind typed
//! parameters and results. Calls are validated locally, then sent through a
//! retrying HTTP transport that classifies failures, backs off with jitter
//! on transient errors, and honors per-call cancellation and deadlines.
//!
//! # Main Components
//!
//! - **Client**: [`Client`] and [`ClientBuilder`], sharing one transport
//! - **Images**: [`images::ImagesService`] with JSON and raw-binary modes
//! - **Transport**: request building, error classification and retry in [`http`]
//! - **Types**: aspect ratios, model versions, formats and results in [`types`]
//!
//! # Example
//!
//! ```no_run
//! use reve_core::{Client, CreateParams, AspectRatio, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = Client::from_env()?;
//!     let params = CreateParams::new("a lighthouse at dusk")
//!         .with_aspect_ratio(AspectRatio::Ratio16x9);
//!     let result = client.images().create(&params).await?;
//!     result.save_to("lighthouse.png")?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod images;
pub mod logging;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, CancelReason, Error, ErrorCode, RequestError, Result, ValidationError};
pub use http::{CallOptions, ProxyConfig, RetryPolicy};
pub use images::{
    BatchResult, CostEstimate, CreateParams, EditParams, ImagesService, RemixParams,
};
pub use logging::{ConsoleLogger, Logger, TracingLogger};
pub use types::{
    image_ref, AspectRatio, Image, ImageResult, ModelVersion, OutputFormat, Postprocess,
    RawImage,
};

// Callers pass tokens into `CallOptions`
pub use tokio_util::sync::CancellationToken;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
