//! Configuration management for the CLI
//!
//! Settings are layered, later sources winning:
//! - Library defaults
//! - Configuration file (YAML/JSON)
//! - Environment variables and command-line flags

use crate::cli::Cli;
use crate::error::{Error, Result};
use reve_core::{ClientConfig, ProxyConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Contents of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key; prefer REVE_API_KEY over storing it here
    pub api_key: Option<String>,

    /// Base URL override
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout: Option<u64>,

    /// Maximum retries
    pub max_retries: Option<u32>,

    /// Network routing
    pub proxy: ProxySettings,

    /// Echo request/response lines
    pub debug: bool,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Proxy section of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// HTTP(S) proxy URL
    pub http: Option<String>,

    /// SOCKS5 proxy as host:port
    pub socks5: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,

    /// Ignore proxy environment variables
    pub disabled: bool,
}

/// Logging section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration file");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".reve.yaml"),
            PathBuf::from(".reve.yml"),
            PathBuf::from(".reve.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let reve_dir = config_dir.join("reve");
            paths.push(reve_dir.join("config.yaml"));
            paths.push(reve_dir.join("config.json"));
        }

        paths
    }

    /// Apply command-line flags and environment on top of this file
    pub fn merge_cli(&mut self, cli: &Cli) {
        if cli.api_key.is_some() {
            self.api_key = cli.api_key.clone();
        }
        if cli.base_url.is_some() {
            self.base_url = cli.base_url.clone();
        }
        if cli.timeout.is_some() {
            self.timeout = cli.timeout;
        }
        if cli.max_retries.is_some() {
            self.max_retries = cli.max_retries;
        }
        if let Some(proxy) = &cli.proxy {
            self.proxy.http = Some(proxy.clone());
            self.proxy.socks5 = None;
        }
        if let Some(socks5) = &cli.socks5 {
            self.proxy.socks5 = Some(socks5.clone());
            self.proxy.http = None;
        }
        self.debug |= cli.debug;
    }

    /// Build the library configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::ApiKeyMissing)?;

        let mut config = ClientConfig::new(api_key);
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        config.debug = self.debug;
        config.proxy = self.proxy.to_proxy_config()?;
        config.user_agent = format!("reve-cli/{}", env!("CARGO_PKG_VERSION"));

        Ok(config)
    }
}

impl ProxySettings {
    fn to_proxy_config(&self) -> Result<ProxyConfig> {
        let username = self.username.clone().filter(|u| !u.is_empty());
        match (&self.http, &self.socks5) {
            (Some(_), Some(_)) => Err(Error::config("set either an HTTP or a SOCKS5 proxy, not both")),
            (Some(url), None) => Ok(ProxyConfig::Http {
                url: url.clone(),
                password: username.as_ref().and(self.password.clone()),
                username,
            }),
            (None, Some(address)) => Ok(ProxyConfig::socks5(
                address.clone(),
                username.as_deref().unwrap_or(""),
                self.password.as_deref().unwrap_or(""),
            )),
            (None, None) if self.disabled => Ok(ProxyConfig::Disabled),
            (None, None) => Ok(ProxyConfig::Environment),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_and_json_files() {
        let dir = tempdir().unwrap();

        let yaml = dir.path().join("reve.yaml");
        fs::write(&yaml, "base_url: http://localhost:9000\nmax_retries: 1\nproxy:\n  socks5: 127.0.0.1:1080\n").unwrap();
        let config = Config::from_file(&yaml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.max_retries, Some(1));
        assert_eq!(config.proxy.socks5.as_deref(), Some("127.0.0.1:1080"));

        let json = dir.path().join("reve.json");
        fs::write(&json, r#"{"timeout": 30, "debug": true}"#).unwrap();
        let config = Config::from_file(&json).unwrap();
        assert_eq!(config.timeout, Some(30));
        assert!(config.debug);

        assert!(matches!(
            Config::from_file(&dir.path().join("missing.yaml")),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_cli_flags_win() {
        let mut config = Config {
            api_key: Some("file-key".into()),
            base_url: Some("http://file".into()),
            max_retries: Some(7),
            ..Default::default()
        };
        let cli = Cli::parse_from([
            "reve",
            "--api-key",
            "flag-key",
            "--max-retries",
            "0",
            "--proxy",
            "http://proxy:3128",
            "estimate",
            "create",
        ]);
        config.merge_cli(&cli);

        let client = config.client_config().unwrap();
        assert_eq!(client.api_key, "flag-key");
        assert_eq!(client.base_url, "http://file");
        assert_eq!(client.max_retries, 0);
        assert_eq!(client.proxy, ProxyConfig::http("http://proxy:3128"));
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default();
        assert!(matches!(config.client_config(), Err(Error::ApiKeyMissing)));
    }

    #[test]
    fn test_proxy_settings() {
        let settings = ProxySettings {
            disabled: true,
            ..Default::default()
        };
        assert_eq!(settings.to_proxy_config().unwrap(), ProxyConfig::Disabled);

        let settings = ProxySettings {
            socks5: Some("127.0.0.1:1080".into()),
            username: Some("user".into()),
            password: Some("pass".into()),
            ..Default::default()
        };
        assert_eq!(
            settings.to_proxy_config().unwrap(),
            ProxyConfig::socks5("127.0.0.1:1080", "user", "pass")
        );
    }
}
