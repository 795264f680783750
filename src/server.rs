//! HTTP Server
//!
//! This module implements the Prometheus exporter HTTP server.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - Liveness check, always 200 while the process serves
//!
//! # Metrics Collection
//!
//! There is no background loop. Every request to `/metrics` fetches one
//! snapshot from qBittorrent and translates it. If the fetch fails the request
//! is answered with 500 and no metrics at all.
//!
//! # Shutdown
//!
//! The listener stops accepting connections on SIGINT or SIGTERM and the
//! server returns once in-flight requests have finished.

use crate::collectors::{QbittorrentCollector, TranslateOptions};
use crate::config::Config;
use crate::error::ExporterError;
use crate::metrics;
use crate::qbittorrent::{QbittorrentClient, SnapshotSource};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

struct AppState<S> {
    collector: Arc<QbittorrentCollector<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            collector: self.collector.clone(),
        }
    }
}

/// Build the exporter routes around a collector
pub fn router<S>(collector: Arc<QbittorrentCollector<S>>) -> Router
where
    S: SnapshotSource + 'static,
{
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler::<S>))
        .route("/health", get(health_handler))
        .with_state(AppState { collector })
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let client = Arc::new(QbittorrentClient::new(config.qbittorrent()?)?);
    let options = TranslateOptions {
        torrent_id_label: config.torrent_id_label,
    };
    let collector = Arc::new(QbittorrentCollector::new(client, options));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    serve(listener, router(collector), shutdown_signal()).await
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ExporterError::Io)?;

    info!("Metrics server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, stopping metrics server");
}

async fn root_handler() -> impl IntoResponse {
    r#"<html>
<head><title>qBittorrent Exporter</title></head>
<body>
<h1>qBittorrent Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#
}

async fn metrics_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: SnapshotSource + 'static,
{
    let families = match state.collector.collect().await {
        Ok(families) => families,
        Err(e) => {
            error!("Failed to collect metrics from qBittorrent: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error collecting metrics: {}", e),
            )
                .into_response();
        }
    };

    match metrics::render(&families) {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
