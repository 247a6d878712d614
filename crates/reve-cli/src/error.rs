//! Error types and handling for the CLI
//!
//! Each kind maps to a distinct process exit code.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from reve-core library
    #[error("{0}")]
    Core(#[from] reve_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// API key missing
    #[error("API key required. Set via --api-key, REVE_API_KEY or the config file")]
    ApiKeyMissing,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(core) => match core {
                reve_core::Error::Api(api) if api.is_auth_failure() => 9,
                reve_core::Error::Api(_) => 2,
                reve_core::Error::Request(_) => 10,
                reve_core::Error::Validation(_) => 6,
                reve_core::Error::Cancelled(_) => 130,
                reve_core::Error::Configuration { .. } => 5,
                _ => 2,
            },
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::ApiKeyMissing => 9,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgs(_) | Self::Core(reve_core::Error::Validation(_))
        )
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Self::other(format!("{error:#}"))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    use colored::Colorize;

    let mut message = if use_color {
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {error}")
    };

    if let Error::Core(core) = error {
        if let Some(api) = core.api() {
            if api.is_insufficient_balance() {
                message.push_str("\nYour account has run out of credits.");
            } else if api.is_retryable() {
                message.push_str("\nThe service is busy; try again shortly or raise --max-retries.");
            }
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use reve_core::{ApiError, CancelReason, ValidationError};

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::ApiKeyMissing.exit_code(), 9);
        assert_eq!(
            Error::from(reve_core::Error::from(ValidationError::EmptyPrompt)).exit_code(),
            6
        );
        assert_eq!(
            Error::from(reve_core::Error::Cancelled(CancelReason::Cancelled)).exit_code(),
            130
        );
        let unauthorized = ApiError::new(401, None, "bad key");
        assert_eq!(Error::from(reve_core::Error::from(unauthorized)).exit_code(), 9);
    }

    #[test]
    fn test_format_without_color() {
        let error = Error::config("missing base URL");
        assert_eq!(
            format_error(&error, false),
            "Error: Configuration error: missing base URL"
        );

        let busy = Error::from(reve_core::Error::from(ApiError::new(503, None, "overloaded")));
        assert!(format_error(&busy, false).contains("try again shortly"));
    }
}
