//! HTTP error classification
//!
//! Turns a failed exchange into an [`ApiError`] with a retry verdict, and
//! defines the [`RequestError`] used for failures that never reached a
//! classifiable response.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::http::headers::{header_str, REQUEST_ID};

/// Statuses that signal a transient server or capacity condition
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Symbolic error codes reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    MissingRequiredParameter,
    PromptTooLong,
    ContentPolicyViolation,
    IndexOutOfBounds,
    InvalidApiKey,
    InsufficientCredits,
    RateLimitExceeded,
    InternalError,
    /// A code this client does not know about yet
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::MissingRequiredParameter => "MISSING_REQUIRED_PARAMETER",
            ErrorCode::PromptTooLong => "PROMPT_TOO_LONG",
            ErrorCode::ContentPolicyViolation => "CONTENT_POLICY_VIOLATION",
            ErrorCode::IndexOutOfBounds => "INDEX_OUT_OF_BOUNDS",
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::InsufficientCredits => "INSUFFICIENT_CREDITS",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::Other(code) => code,
        }
    }

    /// Code implied by a bare HTTP status when the body carried none
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ErrorCode::InvalidApiKey),
            402 => Some(ErrorCode::InsufficientCredits),
            429 => Some(ErrorCode::RateLimitExceeded),
            500 => Some(ErrorCode::InternalError),
            _ => None,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "MISSING_REQUIRED_PARAMETER" => ErrorCode::MissingRequiredParameter,
            "PROMPT_TOO_LONG" => ErrorCode::PromptTooLong,
            "CONTENT_POLICY_VIOLATION" => ErrorCode::ContentPolicyViolation,
            "INDEX_OUT_OF_BOUNDS" => ErrorCode::IndexOutOfBounds,
            "INVALID_API_KEY" => ErrorCode::InvalidApiKey,
            "INSUFFICIENT_CREDITS" => ErrorCode::InsufficientCredits,
            "RATE_LIMIT_EXCEEDED" => ErrorCode::RateLimitExceeded,
            "INTERNAL_ERROR" => ErrorCode::InternalError,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        ErrorCode::from(code.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload as the service sends it
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    params: Option<Map<String, Value>>,
}

/// Failure reported by the remote service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Symbolic error code, if the body or status implied one
    pub code: Option<ErrorCode>,
    /// Human-readable message
    pub message: String,
    /// Extra parameter detail attached by the service
    pub params: Option<Map<String, Value>>,
    /// HTTP status of the failed exchange
    pub status: u16,
    /// Request identifier echoed by the service
    pub request_id: String,
}

impl ApiError {
    /// Create an error without body detail
    pub fn new(status: u16, code: Option<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: None,
            status,
            request_id: String::new(),
        }
    }

    /// Classify a failed response from its status, headers and body.
    ///
    /// A body that is not a structured error payload becomes the message
    /// verbatim; an empty body falls back to the status reason phrase.
    pub fn from_parts(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let mut error = Self::new(status.as_u16(), None, String::new());
        error.request_id = header_str(headers, REQUEST_ID).to_string();

        match serde_json::from_slice::<ErrorPayload>(body) {
            Ok(payload) => {
                error.code = payload
                    .error_code
                    .filter(|code| !code.is_empty())
                    .map(ErrorCode::from);
                error.message = payload.message.unwrap_or_default();
                error.params = payload.params;
            }
            Err(_) => {
                error.message = String::from_utf8_lossy(body).into_owned();
                if error.message.is_empty() {
                    error.message = status.canonical_reason().unwrap_or_default().to_string();
                }
            }
        }

        if error.code.is_none() {
            error.code = ErrorCode::from_status(error.status);
        }

        error
    }

    /// Retry verdict, a pure function of the HTTP status
    pub fn is_retryable(&self) -> bool {
        is_retryable_status(self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.code_is(&ErrorCode::RateLimitExceeded) || self.status == 429
    }

    pub fn is_insufficient_balance(&self) -> bool {
        self.code_is(&ErrorCode::InsufficientCredits) || self.status == 402
    }

    pub fn is_content_violation(&self) -> bool {
        self.code_is(&ErrorCode::ContentPolicyViolation)
    }

    pub fn is_auth_failure(&self) -> bool {
        self.code_is(&ErrorCode::InvalidApiKey) || self.status == 401
    }

    fn code_is(&self, code: &ErrorCode) -> bool {
        self.code.as_ref() == Some(code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code.as_ref().map(ErrorCode::as_str).unwrap_or("");
        if self.request_id.is_empty() {
            write!(
                f,
                "reve: {} (code={}, status={})",
                self.message, code, self.status
            )
        } else {
            write!(
                f,
                "reve: {} (code={}, status={}, request_id={})",
                self.message, code, self.status, self.request_id
            )
        }
    }
}

impl std::error::Error for ApiError {}

/// Failure before or outside the HTTP exchange
#[derive(Error, Debug)]
#[error("reve: {op}: {source}")]
pub struct RequestError {
    op: &'static str,
    #[source]
    source: anyhow::Error,
}

impl RequestError {
    pub fn new(op: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self {
            op,
            source: source.into(),
        }
    }

    /// Which step failed: "marshal", "create request", "http" or "read response"
    pub fn op(&self) -> &'static str {
        self.op
    }

    /// True when the underlying cause was a transport timeout
    pub fn is_timeout(&self) -> bool {
        self.source
            .downcast_ref::<reqwest::Error>()
            .map(reqwest::Error::is_timeout)
            .unwrap_or(false)
    }
}

/// Check if an HTTP status is worth retrying
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}
