//! Torrent Info Collector
//!
//! # Metrics Produced
//! - `qbittorrent_torrent_info` - Constant information of a torrent (value is always 1)
//!   - Labels: name, state, category, hash, total_size_bytes,
//!     added_timestamp_seconds, completed_timestamp_seconds

use super::{TranslateOptions, TORRENT_PREFIX};
use crate::metrics::MetricFamily;
use crate::qbittorrent::types::MainData;

const INFO_LABELS: [&str; 6] = [
    "state",
    "category",
    "hash",
    "total_size_bytes",
    "added_timestamp_seconds",
    "completed_timestamp_seconds",
];

pub fn collect_info_metrics(maindata: &MainData, options: &TranslateOptions) -> Vec<MetricFamily> {
    let mut label_names = options.torrent_label_names();
    label_names.extend(INFO_LABELS);

    let mut torrent_info =
        MetricFamily::info(TORRENT_PREFIX, "The constant information of a torrent")
            .with_labels(&label_names);

    for (id, torrent) in &maindata.torrents {
        let mut labels = options.torrent_label_values(id, torrent);
        labels.extend([
            torrent.state.clone(),
            torrent.category.clone(),
            torrent.info_hash().to_string(),
            torrent.total_size.to_string(),
            torrent.added_on.to_string(),
            torrent.completion_on.to_string(),
        ]);
        torrent_info.add_sample(labels, 1.0);
    }

    vec![torrent_info]
}
