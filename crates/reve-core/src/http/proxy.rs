//! Outbound proxy selection
//!
//! Chooses how the underlying `reqwest` client reaches the API. The request
//! and response protocol is the same on every path.

use reqwest::{ClientBuilder, Proxy};
use url::Url;

use crate::error::{Error, Result};

/// How outbound connections are routed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxyConfig {
    /// Honor `HTTP_PROXY`, `HTTPS_PROXY`, `ALL_PROXY` and `NO_PROXY`
    #[default]
    Environment,
    /// Connect directly, ignoring the environment
    Disabled,
    /// Forward through an HTTP(S) proxy
    Http {
        url: String,
        username: Option<String>,
        password: Option<String>,
    },
    /// Tunnel through a SOCKS5 proxy at `host:port`
    Socks5 {
        address: String,
        username: Option<String>,
        password: Option<String>,
    },
}

impl ProxyConfig {
    pub fn http(url: impl Into<String>) -> Self {
        ProxyConfig::Http {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// SOCKS5 proxy; credentials are used only when `username` is non-empty
    pub fn socks5(address: impl Into<String>, username: &str, password: &str) -> Self {
        let (username, password) = if username.is_empty() {
            (None, None)
        } else {
            (Some(username.to_string()), Some(password.to_string()))
        };
        ProxyConfig::Socks5 {
            address: address.into(),
            username,
            password,
        }
    }

    /// Apply this routing choice to a client builder
    pub fn apply(&self, builder: ClientBuilder) -> Result<ClientBuilder> {
        match self {
            ProxyConfig::Environment => Ok(builder),
            ProxyConfig::Disabled => Ok(builder.no_proxy()),
            ProxyConfig::Http {
                url,
                username,
                password,
            } => {
                let mut proxy = Proxy::all(url.as_str()).map_err(|e| proxy_error(url, e))?;
                if let Some(username) = username {
                    proxy = proxy.basic_auth(username, password.as_deref().unwrap_or(""));
                }
                Ok(builder.proxy(proxy))
            }
            ProxyConfig::Socks5 { address, .. } => {
                let url = self.socks5_url()?;
                let proxy = Proxy::all(url.as_str()).map_err(|e| proxy_error(address, e))?;
                Ok(builder.proxy(proxy))
            }
        }
    }

    /// `socks5h://` so host names resolve on the proxy side
    fn socks5_url(&self) -> Result<Url> {
        let ProxyConfig::Socks5 {
            address,
            username,
            password,
        } = self
        else {
            return Err(Error::configuration("not a SOCKS5 proxy"));
        };

        let mut url = Url::parse(&format!("socks5h://{address}"))
            .map_err(|e| proxy_error(address, e))?;
        if let Some(username) = username {
            url.set_username(username)
                .map_err(|_| Error::configuration("invalid SOCKS5 username"))?;
            url.set_password(password.as_deref())
                .map_err(|_| Error::configuration("invalid SOCKS5 password"))?;
        }
        Ok(url)
    }
}

fn proxy_error(target: &str, source: impl Into<anyhow::Error>) -> Error {
    Error::Configuration {
        message: format!("invalid proxy {target}"),
        source: Some(source.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_environment() {
        assert_eq!(ProxyConfig::default(), ProxyConfig::Environment);
    }

    #[test]
    fn test_socks5_credentials() {
        let proxy = ProxyConfig::socks5("127.0.0.1:1080", "user", "p@ss");
        let url = proxy.socks5_url().unwrap();
        assert_eq!(url.scheme(), "socks5h");
        assert_eq!(url.username(), "user");
        assert_eq!(url.password(), Some("p%40ss"));

        let anonymous = ProxyConfig::socks5("127.0.0.1:1080", "", "ignored");
        let url = anonymous.socks5_url().unwrap();
        assert_eq!(url.username(), "");
        assert_eq!(url.password(), None);
    }

    #[test]
    fn test_apply_builds_client() {
        for proxy in [
            ProxyConfig::Environment,
            ProxyConfig::Disabled,
            ProxyConfig::http("http://proxy.example.com:8080"),
            ProxyConfig::socks5("127.0.0.1:1080", "user", "pass"),
        ] {
            let builder = proxy.apply(reqwest::Client::builder()).unwrap();
            assert!(builder.build().is_ok(), "{proxy:?}");
        }
    }

    #[test]
    fn test_invalid_http_proxy() {
        let proxy = ProxyConfig::http("http://[::1");
        assert!(matches!(
            proxy.apply(reqwest::Client::builder()),
            Err(Error::Configuration { .. })
        ));
    }
}
