//! Torrent Completion Collector
//!
//! Download and upload progress of each torrent.
//!
//! # Metrics Produced
//! - `qbittorrent_torrent_total_downloaded_bytes_total` - Downloaded, including files later excluded
//! - `qbittorrent_torrent_downloaded_bytes_total` - Downloaded of the selected files only
//! - `qbittorrent_torrent_uploaded_bytes_total` - Uploaded
//! - `qbittorrent_torrent_total_size_bytes` - Size including excluded files
//! - `qbittorrent_torrent_size_bytes` - Size of the selected files
//! - `qbittorrent_torrent_eta_seconds` - Estimated time remaining
//!
//! All labelled by torrent name.

use super::{TranslateOptions, TORRENT_PREFIX};
use crate::metrics::MetricFamily;
use crate::qbittorrent::types::MainData;

pub fn collect_completion_metrics(
    maindata: &MainData,
    options: &TranslateOptions,
) -> Vec<MetricFamily> {
    let labels = options.torrent_label_names();
    let name = |suffix: &str| format!("{}_{}", TORRENT_PREFIX, suffix);

    let mut total_downloaded = MetricFamily::counter(
        &name("total_downloaded"),
        "The total amount downloaded for a torrent, including even sections subsequently marked as 'Do not download'",
    )
    .with_unit("bytes")
    .with_labels(&labels);
    let mut relevant_downloaded = MetricFamily::counter(
        &name("downloaded"),
        "The amount downloaded for a torrent, including only sections marked for download",
    )
    .with_unit("bytes")
    .with_labels(&labels);
    let mut total_uploaded = MetricFamily::counter(
        &name("uploaded"),
        "The total amount uploaded for a torrent, including sections subsequently marked as 'Do not download'",
    )
    .with_unit("bytes")
    .with_labels(&labels);
    let mut total_size = MetricFamily::gauge(
        &name("total_size"),
        "The total size of a torrent, including sections marked as 'Do not download'",
    )
    .with_unit("bytes")
    .with_labels(&labels);
    let mut size = MetricFamily::gauge(
        &name("size"),
        "The size of a torrent, including only sections marked for download",
    )
    .with_unit("bytes")
    .with_labels(&labels);
    let mut eta = MetricFamily::gauge(&name("eta"), "The estimated time remaining for a torrent")
        .with_unit("seconds")
        .with_labels(&labels);

    for (id, torrent) in &maindata.torrents {
        let values = options.torrent_label_values(id, torrent);

        total_downloaded.add_sample(values.clone(), torrent.downloaded as f64);
        // qBittorrent has no field for this; size excludes unselected files
        relevant_downloaded.add_sample(values.clone(), torrent.relevant_downloaded() as f64);
        total_uploaded.add_sample(values.clone(), torrent.uploaded as f64);
        total_size.add_sample(values.clone(), torrent.total_size as f64);
        size.add_sample(values.clone(), torrent.size as f64);
        eta.add_sample(values, torrent.eta as f64);
    }

    vec![
        total_downloaded,
        relevant_downloaded,
        total_uploaded,
        total_size,
        size,
        eta,
    ]
}
