//! qBittorrent Prometheus Exporter
//!
//! A Prometheus metrics exporter for the qBittorrent WebUI API.
//!
//! # Overview
//!
//! On every scrape the exporter fetches `sync/maindata` from qBittorrent and
//! translates the snapshot into global transfer counters and per-torrent
//! completion, connection and info metrics. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐       HTTP/JSON      ┌──────────────┐
//! │ qBittorrent │ ◄─────────────────►  │   Exporter   │
//! │   WebUI     │   SID cookie auth    │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │ Client │  │ ◄────────────► │ Prometheus │
//!                                      │  └────────┘  │   /metrics     └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Collect │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`qbittorrent`] - WebUI client, session handling and API type definitions
//! - [`collectors`] - Snapshot to metric family translation
//! - [`metrics`] - Metric family model and Prometheus text rendering
//! - [`server`] - HTTP server and graceful shutdown
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use qbittorrent_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some(std::path::Path::new("config.yaml")))?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod qbittorrent;
pub mod server;
