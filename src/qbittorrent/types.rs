//! qBittorrent WebUI API Type Definitions
//!
//! Only the fields the exporter reads are declared. Every field without a
//! `#[serde(default)]` is required, so a payload missing one of them is
//! rejected at decode time instead of surfacing later during translation.
//!
//! Field documentation for the torrent list can be found at
//! <https://github.com/qbittorrent/qBittorrent/wiki/WebUI-API-(qBittorrent-4.1)#get-torrent-list>
//!
//! # API Endpoints Covered
//!
//! - `sync/maindata` → [`MainData`], [`ServerState`], [`Torrent`]

use serde::Deserialize;
use std::collections::BTreeMap;

/// Full snapshot returned by `GET /api/v2/sync/maindata`
#[derive(Debug, Clone, Deserialize)]
pub struct MainData {
    pub server_state: ServerState,
    /// Torrents keyed by their identifier (info hash)
    pub torrents: BTreeMap<String, Torrent>,
}

/// Global transfer counters
#[derive(Debug, Clone, Deserialize)]
pub struct ServerState {
    pub alltime_dl: u64,
    pub alltime_ul: u64,
    /// Data downloaded this session
    #[serde(default)]
    pub dl_info_data: Option<u64>,
    /// Data uploaded this session
    #[serde(default)]
    pub up_info_data: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Torrent {
    pub name: String,
    pub amount_left: i64,
    pub downloaded: i64,
    pub uploaded: i64,
    pub eta: i64,
    /// All known seeds
    pub num_complete: i64,
    /// All known leeches
    pub num_incomplete: i64,
    /// Connected seeds
    pub num_seeds: i64,
    /// Connected leeches
    pub num_leechs: i64,
    /// `total_size` minus the files marked as "Do not download"
    pub size: i64,
    pub total_size: i64,
    /// Unix time of last activity
    pub last_activity: i64,
    pub state: String,
    pub category: String,
    #[serde(default)]
    pub infohash_v1: String,
    #[serde(default)]
    pub infohash_v2: String,
    pub added_on: i64,
    pub completion_on: i64,
}

impl Torrent {
    /// Bytes downloaded of the files selected for download
    pub fn relevant_downloaded(&self) -> i64 {
        self.size - self.amount_left
    }

    /// v1 info hash, or the v2 hash for v2-only torrents
    pub fn info_hash(&self) -> &str {
        if self.infohash_v1.is_empty() {
            &self.infohash_v2
        } else {
            &self.infohash_v1
        }
    }
}
