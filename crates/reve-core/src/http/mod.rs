//! HTTP transport for Reve API communication
//!
//! This module provides:
//! - Request building with authentication and replayable bodies
//! - Error classification of failed responses
//! - Retry logic with jittered exponential backoff
//! - JSON and raw-binary response handling
//! - Cancellation and deadlines per call
//! - Proxy routing

pub mod builder;
pub mod client;
pub mod context;
pub mod error;
pub mod headers;
pub mod proxy;
pub mod retry;

pub use builder::{ApiRequest, PreparedRequest, RequestBuilder};
pub use client::{HttpTransport, JsonResponse, RawResponse};
pub use context::CallOptions;
pub use error::{is_retryable_status, ApiError, ErrorCode, RequestError, RETRYABLE_STATUSES};
pub use proxy::ProxyConfig;
pub use retry::{Retrier, RetryDecision, RetryPolicy};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
