//! Metrics Collectors
//!
//! This module turns one qBittorrent snapshot into Prometheus metric families.
//! Each submodule covers one independent group of metrics and is a pure
//! function of the snapshot.
//!
//! # Architecture
//!
//! - [`QbittorrentCollector`] fetches a snapshot from a [`SnapshotSource`] on
//!   every scrape and hands it to [`translate`]
//! - [`translate`] concatenates the groups in a fixed order: global, info,
//!   completion, connection
//!
//! # Error Handling
//!
//! Translation cannot fail. Fetch errors are returned from
//! [`QbittorrentCollector::collect`] untouched, so a failed scrape never
//! produces a partial batch.

use crate::error::Result;
use crate::metrics::MetricFamily;
use crate::qbittorrent::types::{MainData, Torrent};
use crate::qbittorrent::SnapshotSource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod completion;
pub mod connection;
pub mod global;
pub mod info;

pub use completion::collect_completion_metrics;
pub use connection::collect_connection_metrics;
pub use global::collect_global_metrics;
pub use info::collect_info_metrics;

/// Prefix of the server-wide metrics
pub const GLOBAL_PREFIX: &str = "qbittorrent_global";

/// Prefix of the per-torrent metrics
pub const TORRENT_PREFIX: &str = "qbittorrent_torrent";

/// Options that shape the translated metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Add an `id` label holding the torrent identifier next to `name`
    pub torrent_id_label: bool,
}

impl TranslateOptions {
    /// Label names identifying a torrent
    pub fn torrent_label_names(&self) -> Vec<&'static str> {
        if self.torrent_id_label {
            vec!["name", "id"]
        } else {
            vec!["name"]
        }
    }

    /// Label values identifying `torrent`, matching [`Self::torrent_label_names`]
    pub fn torrent_label_values(&self, id: &str, torrent: &Torrent) -> Vec<String> {
        if self.torrent_id_label {
            vec![torrent.name.clone(), id.to_string()]
        } else {
            vec![torrent.name.clone()]
        }
    }
}

/// Translate a snapshot into metric families
pub fn translate(maindata: &MainData, options: &TranslateOptions) -> Vec<MetricFamily> {
    if !options.torrent_id_label {
        warn_on_duplicate_names(maindata);
    }

    let mut families = collect_global_metrics(maindata);
    families.extend(collect_info_metrics(maindata, options));
    families.extend(collect_completion_metrics(maindata, options));
    families.extend(collect_connection_metrics(maindata, options));
    families
}

fn warn_on_duplicate_names(maindata: &MainData) {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(maindata.torrents.len());
    for torrent in maindata.torrents.values() {
        *seen.entry(torrent.name.as_str()).or_insert(0) += 1;
    }

    let mut duplicates: Vec<&str> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();

    if !duplicates.is_empty() {
        duplicates.sort_unstable();
        warn!(
            "Torrents sharing a name will collide in the exposition: {:?} (enable torrent_id_label to tell them apart)",
            duplicates
        );
    }
}

/// Fetches a snapshot per scrape and translates it
pub struct QbittorrentCollector<S> {
    source: Arc<S>,
    options: TranslateOptions,
}

impl<S: SnapshotSource> QbittorrentCollector<S> {
    pub fn new(source: Arc<S>, options: TranslateOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub async fn collect(&self) -> Result<Vec<MetricFamily>> {
        let maindata = self.source.snapshot().await?;
        debug!(
            "Fetched qBittorrent snapshot with {} torrents",
            maindata.torrents.len()
        );
        Ok(translate(&maindata, &self.options))
    }
}
