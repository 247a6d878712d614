//! Client facade and builder

use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpTransport, ProxyConfig};
use crate::images::ImagesService;
use crate::logging::{Logger, SharedLogger};

/// Entry point to the Reve API.
///
/// Cloning is cheap: clones share one transport and its connection pool,
/// so a single client can serve many tasks.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    images: ImagesService,
}

impl Client {
    /// Client with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Client configured from `REVE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);

        tracing::debug!(
            base_url = %config.base_url,
            max_retries = config.max_retries,
            timeout_secs = config.timeout.as_secs(),
            "Created Reve client"
        );

        Ok(Self {
            config: Arc::new(config),
            images: ImagesService::new(transport),
        })
    }

    /// Image generation endpoints
    pub fn images(&self) -> &ImagesService {
        &self.images
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Builder for [`Client`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(api_key),
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn retry(mut self, max_retries: u32, min_wait: Duration, max_wait: Duration) -> Self {
        self.config.max_retries = max_retries;
        self.config.retry_min_wait = min_wait;
        self.config.retry_max_wait = max_wait;
        self
    }

    /// Make exactly one attempt per call
    pub fn no_retry(mut self) -> Self {
        self.config.max_retries = 0;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Route debug lines to `logger` instead of stderr
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.config.logger = Some(SharedLogger::new(logger));
        self
    }

    pub fn http_proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = ProxyConfig::http(url);
        self
    }

    pub fn socks5_proxy(mut self, address: impl Into<String>, username: &str, password: &str) -> Self {
        self.config.proxy = ProxyConfig::socks5(address, username, password);
        self
    }

    /// Use proxies from the environment (the default)
    pub fn env_proxy(mut self) -> Self {
        self.config.proxy = ProxyConfig::Environment;
        self
    }

    pub fn no_proxy(mut self) -> Self {
        self.config.proxy = ProxyConfig::Disabled;
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = proxy;
        self
    }

    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
