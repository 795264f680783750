//! Torrent Connection Collector
//!
//! # Metrics Produced
//! - `qbittorrent_torrent_total_seeds` - Known seeds
//! - `qbittorrent_torrent_connected_seeds` - Seeds currently connected
//! - `qbittorrent_torrent_total_leeches` - Known leeches
//! - `qbittorrent_torrent_connected_leeches` - Leeches currently connected
//! - `qbittorrent_torrent_last_activity_timestamp_seconds` - Last activity
//!
//! All labelled by torrent name.

use super::{TranslateOptions, TORRENT_PREFIX};
use crate::metrics::MetricFamily;
use crate::qbittorrent::types::MainData;

pub fn collect_connection_metrics(
    maindata: &MainData,
    options: &TranslateOptions,
) -> Vec<MetricFamily> {
    let labels = options.torrent_label_names();
    let gauge = |suffix: &str, help: &str| {
        MetricFamily::gauge(&format!("{}_{}", TORRENT_PREFIX, suffix), help).with_labels(&labels)
    };

    let mut total_seeds = gauge("total_seeds", "The total amount of known seeds for a torrent");
    let mut connected_seeds = gauge(
        "connected_seeds",
        "The amount of seeds for a torrent which are currently connected to the client",
    );
    let mut total_leeches = gauge(
        "total_leeches",
        "The total amount of known leeches for a torrent",
    );
    let mut connected_leeches = gauge(
        "connected_leeches",
        "The amount of leeches for a torrent which are currently connected to the client",
    );
    let mut last_activity = gauge(
        "last_activity",
        "The timestamp of when a torrent was last active",
    )
    .with_unit("timestamp_seconds");

    for (id, torrent) in &maindata.torrents {
        let values = options.torrent_label_values(id, torrent);

        total_seeds.add_sample(values.clone(), torrent.num_complete as f64);
        connected_seeds.add_sample(values.clone(), torrent.num_seeds as f64);
        total_leeches.add_sample(values.clone(), torrent.num_incomplete as f64);
        connected_leeches.add_sample(values.clone(), torrent.num_leechs as f64);
        last_activity.add_sample(values, torrent.last_activity as f64);
    }

    vec![
        total_seeds,
        connected_seeds,
        total_leeches,
        connected_leeches,
        last_activity,
    ]
}
