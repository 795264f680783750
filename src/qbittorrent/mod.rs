pub mod client;
pub mod session;
pub mod types;

pub use client::QbittorrentClient;
pub use session::SessionManager;

use crate::error::Result;
use std::future::Future;
use types::MainData;

/// Anything that can produce a fresh [`MainData`] snapshot
///
/// Implemented by [`QbittorrentClient`]; tests substitute canned snapshots.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> impl Future<Output = Result<MainData>> + Send;
}
