//! qBittorrent WebUI API Client
//!
//! This module provides a client for the qBittorrent WebUI HTTP API.
//!
//! # Authentication
//!
//! Requests carry the session cookie held by the [`SessionManager`]. qBittorrent
//! answers 403 when the cookie is missing or expired; the client then logs in
//! once and repeats the request. A second 403 is reported as
//! [`ExporterError::Auth`].
//!
//! # Example
//!
//! ```no_run
//! use qbittorrent_exporter::config::QbittorrentConfig;
//! use qbittorrent_exporter::qbittorrent::QbittorrentClient;
//! use secrecy::SecretString;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = QbittorrentConfig {
//!     url: "http://localhost:8080/".parse()?,
//!     username: "admin".to_string(),
//!     password: SecretString::from("adminadmin"),
//!     verify_ssl: true,
//!     request_timeout: Duration::from_secs(10),
//! };
//!
//! let client = QbittorrentClient::new(config)?;
//! let maindata = client.fetch_maindata().await?;
//! println!("{} torrents", maindata.torrents.len());
//! # Ok(())
//! # }
//! ```

use crate::config::QbittorrentConfig;
use crate::error::{ExporterError, Result};
use crate::qbittorrent::session::SessionManager;
use crate::qbittorrent::types::MainData;
use crate::qbittorrent::SnapshotSource;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Resource path of the full snapshot endpoint
pub const MAINDATA_PATH: &str = "sync/maindata";

/// Client for the qBittorrent WebUI API
///
/// The client is `Send` and `Sync` and is meant to be shared behind an `Arc`.
/// The underlying `reqwest::Client` pools connections across calls.
pub struct QbittorrentClient {
    config: Arc<QbittorrentConfig>,
    http: reqwest::Client,
    session: SessionManager,
}

impl QbittorrentClient {
    pub fn new(config: QbittorrentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        let config = Arc::new(config);
        let session = SessionManager::new(config.clone(), http.clone());

        Ok(Self {
            config,
            http,
            session,
        })
    }

    /// Resolve an API resource path against the configured URL
    ///
    /// `sync/maindata` resolves to `<url>/api/v2/sync/maindata`. A leading `/`
    /// skips the `api/v2/` prefix.
    pub fn resource_url(&self, path: &str) -> Result<Url> {
        let relative = match path.strip_prefix('/') {
            Some(stripped) => stripped.to_string(),
            None => format!("api/v2/{}", path),
        };
        Ok(self.config.url.join(&relative)?)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Fetch the full server and torrent snapshot
    pub async fn fetch_maindata(&self) -> Result<MainData> {
        self.fetch(MAINDATA_PATH).await
    }

    /// GET an API resource and decode its JSON body
    ///
    /// A 403 triggers exactly one login followed by exactly one repeated
    /// request. Any other status is decoded as-is; a body that does not match
    /// `T` yields [`ExporterError::Parse`].
    pub async fn fetch<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.resource_url(path)?;
        let mut logged_in = false;

        loop {
            debug!("Requesting {}", url);
            let response = self
                .http
                .get(url.clone())
                .header(COOKIE, self.session.cookie_header().await)
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::FORBIDDEN {
                if !status.is_success() {
                    warn!("qBittorrent answered {} for {}", status, path);
                }
                let body = response.text().await?;
                return serde_json::from_str(&body).map_err(ExporterError::Parse);
            }

            if logged_in {
                return Err(ExporterError::Auth(format!(
                    "qBittorrent rejected the session for {} right after logging in",
                    path
                )));
            }

            debug!("Session rejected for {}, logging in", path);
            self.session.login().await?;
            logged_in = true;
        }
    }
}

impl SnapshotSource for QbittorrentClient {
    async fn snapshot(&self) -> Result<MainData> {
        self.fetch_maindata().await
    }
}
