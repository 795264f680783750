//! Global Metrics Collector
//!
//! Server-wide transfer totals.
//!
//! # Metrics Produced
//! - `qbittorrent_global_alltime_uploaded_bytes_total`
//! - `qbittorrent_global_alltime_downloaded_bytes_total`
//! - `qbittorrent_global_session_uploaded_bytes_total`
//! - `qbittorrent_global_session_downloaded_bytes_total`
//!
//! The session counters come from `up_info_data` / `dl_info_data`. Payloads
//! without those fields report the all-time totals for both pairs.

use super::GLOBAL_PREFIX;
use crate::metrics::MetricFamily;
use crate::qbittorrent::types::MainData;

fn counter(name: &str, help: &str, value: u64) -> MetricFamily {
    let mut family =
        MetricFamily::counter(&format!("{}_{}", GLOBAL_PREFIX, name), help).with_unit("bytes");
    family.add_sample(Vec::new(), value as f64);
    family
}

pub fn collect_global_metrics(maindata: &MainData) -> Vec<MetricFamily> {
    let state = &maindata.server_state;

    vec![
        counter(
            "alltime_uploaded",
            "The total amount of bytes uploaded with this client",
            state.alltime_ul,
        ),
        counter(
            "alltime_downloaded",
            "The total amount of bytes downloaded with this client",
            state.alltime_dl,
        ),
        counter(
            "session_uploaded",
            "The amount of bytes uploaded with this client since it started",
            state.up_info_data.unwrap_or(state.alltime_ul),
        ),
        counter(
            "session_downloaded",
            "The amount of bytes downloaded with this client since it started",
            state.dl_info_data.unwrap_or(state.alltime_dl),
        ),
    ]
}
