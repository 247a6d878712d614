//! Error types for the Reve client library
//!
//! Every failed call surfaces exactly one of these kinds. API errors come
//! from the remote service, request errors from the local side of the HTTP
//! exchange, and cancellation from the caller abandoning the operation.

use std::fmt;
use thiserror::Error;

pub use crate::http::error::{ApiError, ErrorCode, RequestError};
pub use crate::validator::ValidationError;

/// Main error type for Reve operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failure reported by the remote service
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Failure before or outside the HTTP exchange
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The call was abandoned before it could complete
    #[error("reve: operation {0}")]
    Cancelled(CancelReason),

    /// Parameters rejected before any network traffic
    #[error("reve: invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    /// Client configuration errors
    #[error("reve: configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Image payload could not be decoded or encoded
    #[error("reve: image error: {message}")]
    Image {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A successful JSON body did not match the expected shape
    #[error("reve: failed to decode response: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// File helpers
    #[error("reve: io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a call was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired
    Cancelled,
    /// The overall deadline for the call elapsed
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an image error with an underlying cause
    pub fn image(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Image {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Only API errors with a transient status are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(api) => api.is_retryable(),
            _ => false,
        }
    }

    /// True when the caller abandoned the call
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }

    /// The API error, if the service reported one
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, if there was one
    pub fn status(&self) -> Option<u16> {
        self.api().map(|api| api.status)
    }
}
