//! Client configuration
//!
//! [`ClientConfig`] holds every setting the transport needs. It can be
//! built directly, through [`ClientBuilder`](crate::ClientBuilder), or from
//! `REVE_*` environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::{ProxyConfig, RetryPolicy};
use crate::logging::SharedLogger;

pub const DEFAULT_BASE_URL: &str = "https://api.reve.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_MIN_WAIT: Duration = Duration::from_secs(1);
pub const DEFAULT_RETRY_MAX_WAIT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "REVE_API_KEY";
pub const ENV_BASE_URL: &str = "REVE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "REVE_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "REVE_MAX_RETRIES";
pub const ENV_DEBUG: &str = "REVE_DEBUG";

/// User agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("reve-rust/{}", crate::VERSION)
}

/// Settings for one client and its shared transport
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub user_agent: String,
    /// Per-attempt timeout covering the whole exchange
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub retry_min_wait: Duration,
    pub retry_max_wait: Duration,
    /// Emit request/response lines through `logger`
    pub debug: bool,
    /// Sink for debug lines; stderr when unset
    pub logger: Option<SharedLogger>,
    pub proxy: ProxyConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_min_wait: DEFAULT_RETRY_MIN_WAIT,
            retry_max_wait: DEFAULT_RETRY_MAX_WAIT,
            debug: false,
            logger: None,
            proxy: ProxyConfig::default(),
        }
    }

    /// Read configuration from `REVE_*` environment variables.
    ///
    /// `REVE_API_KEY` is required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::configuration(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout = Duration::from_secs(parse_env(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(retries) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_env(ENV_MAX_RETRIES, &retries)?;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            config.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_min_wait, self.retry_max_wait)
    }

    /// Reject settings the transport cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration("API key is required"));
        }
        url::Url::parse(&self.base_url).map_err(|e| Error::Configuration {
            message: format!("invalid base URL '{}'", self.base_url),
            source: Some(e.into()),
        })?;
        if self.retry_min_wait > self.retry_max_wait {
            return Err(Error::configuration(
                "retry minimum wait must not exceed the maximum wait",
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e: T::Err| Error::Configuration {
        message: format!("invalid value for {name}: '{value}'"),
        source: Some(e.into()),
    })
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_min_wait", &self.retry_min_wait)
            .field("retry_max_wait", &self.retry_max_wait)
            .field("debug", &self.debug)
            .field("logger", &self.logger.is_some())
            .field("proxy", &self.proxy)
            .finish()
    }
}
