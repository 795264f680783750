//! Session Management
//!
//! qBittorrent authenticates WebUI requests with an `SID` cookie handed out by
//! `POST /api/v2/auth/login`. The [`SessionManager`] owns that cookie and is the
//! only place it is ever replaced. It never drops a cookie on its own: an expired
//! session is noticed by the client when qBittorrent answers 403.

use crate::config::QbittorrentConfig;
use crate::error::{ExporterError, Result};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Login endpoint, resolved against the root of the configured URL
pub const LOGIN_PATH: &str = "/api/v2/auth/login";

/// Name of the session cookie issued by qBittorrent
pub const SESSION_COOKIE: &str = "SID";

/// Holds the current qBittorrent session cookie
pub struct SessionManager {
    config: Arc<QbittorrentConfig>,
    http: reqwest::Client,
    sid: RwLock<Option<SecretString>>,
}

impl SessionManager {
    pub fn new(config: Arc<QbittorrentConfig>, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            sid: RwLock::new(None),
        }
    }

    fn login_url(&self) -> Result<Url> {
        Ok(self.config.url.join(LOGIN_PATH)?)
    }

    /// `Cookie` header value for the next request, with an empty SID before the first login
    pub async fn cookie_header(&self) -> String {
        let sid = self.sid.read().await;
        let value = sid.as_ref().map(|s| s.expose_secret()).unwrap_or("");
        format!("{}={}", SESSION_COOKIE, value)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.sid.read().await.is_some()
    }

    /// Log in with the configured credentials and store the new session cookie
    ///
    /// Fails with [`ExporterError::Auth`] when qBittorrent refuses the request
    /// (403, usually an IP ban after repeated failures) or answers without a
    /// session cookie (wrong username or password).
    pub async fn login(&self) -> Result<()> {
        let url = self.login_url()?;
        info!("Logging in to qBittorrent at {}", url);

        let form = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.expose_secret()),
        ];
        let response = self.http.post(url).form(&form).send().await?;

        if response.status() == StatusCode::FORBIDDEN {
            return Err(ExporterError::Auth(
                "qBittorrent refused the login request (too many failed attempts?)".to_string(),
            ));
        }

        let sid = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string());

        match sid {
            Some(sid) => {
                // Replaced in one write; a concurrent login simply wins or loses the race
                *self.sid.write().await = Some(SecretString::from(sid));
                info!("Successfully logged in to qBittorrent");
                Ok(())
            }
            None => {
                match response.text().await {
                    Ok(body) => debug!("Login response without session cookie: {}", body),
                    Err(e) => debug!("Failed to read login response body: {}", e),
                }
                warn!(
                    "qBittorrent did not issue a session for user '{}'",
                    self.config.username
                );
                Err(ExporterError::Auth(format!(
                    "qBittorrent rejected the credentials for user '{}'",
                    self.config.username
                )))
            }
        }
    }
}
