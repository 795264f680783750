//! Configuration management
//!
//! Options are read from an optional YAML file and then overridden by
//! environment variables named `QBITEXPORTER_<OPTION>`. A variable named
//! `QBITEXPORTER_<OPTION>_FILE` points at a file whose contents become the
//! value (useful for Docker secrets) and takes precedence over the plain one.

use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Prefix shared by every environment variable the exporter reads
pub const ENV_PREFIX: &str = "QBITEXPORTER";

/// Every option that may be supplied through a `_FILE` environment variable
const OPTIONS: [&str; 8] = [
    "qbittorrent_url",
    "qbittorrent_username",
    "qbittorrent_password",
    "qbittorrent_verify_ssl",
    "exporter_port",
    "exporter_addr",
    "request_timeout_seconds",
    "torrent_id_label",
];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub qbittorrent_url: Option<Url>,
    #[serde(default)]
    pub qbittorrent_username: Option<String>,
    #[serde(default)]
    pub qbittorrent_password: Option<SecretString>,
    #[serde(default = "default_verify_ssl")]
    pub qbittorrent_verify_ssl: bool,
    #[serde(default = "default_port")]
    pub exporter_port: u16,
    #[serde(default = "default_addr")]
    pub exporter_addr: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Add the torrent hash as an `id` label so torrents sharing a name stay distinct
    #[serde(default)]
    pub torrent_id_label: bool,
}

/// Connection settings handed to [`crate::qbittorrent::QbittorrentClient`]
#[derive(Debug, Clone)]
pub struct QbittorrentConfig {
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub verify_ssl: bool,
    pub request_timeout: Duration,
}

fn default_verify_ssl() -> bool {
    true
}

fn default_port() -> u16 {
    8000
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from `path` (if given) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        Self::from_sources(path, std::env::vars().collect())
    }

    /// Load configuration from `path` (if given) and an explicit set of
    /// environment variables
    pub fn from_sources(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            let name = path
                .to_str()
                .with_context(|| format!("Config path {} is not valid UTF-8", path.display()))?;
            builder = builder.add_source(config::File::new(name, config::FileFormat::Yaml));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .source(Some(env.clone())),
        );

        for option in OPTIONS {
            let var = format!("{}_{}_FILE", ENV_PREFIX, option.to_uppercase());
            if let Some(file) = env.get(&var) {
                let contents = std::fs::read_to_string(file)
                    .with_context(|| format!("Failed to read {} from {}", var, file))?;
                let value = contents.trim_end_matches(&['\r', '\n'][..]).to_string();
                builder = builder
                    .set_override(option, value)
                    .with_context(|| format!("Failed to apply {}", var))?;
            }
        }

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.qbittorrent_url.is_none() {
            return Err(ExporterError::Config(
                "no qBittorrent URL has been provided".to_string(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Client settings derived from this configuration
    pub fn qbittorrent(&self) -> crate::error::Result<QbittorrentConfig> {
        let url = self.qbittorrent_url.clone().ok_or_else(|| {
            ExporterError::Config("no qBittorrent URL has been provided".to_string())
        })?;

        Ok(QbittorrentConfig {
            url,
            username: self.qbittorrent_username.clone().unwrap_or_default(),
            password: self
                .qbittorrent_password
                .clone()
                .unwrap_or_else(|| SecretString::from(String::new())),
            verify_ssl: self.qbittorrent_verify_ssl,
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.exporter_addr, self.exporter_port)
    }
}
