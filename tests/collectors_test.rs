//! Collector tests
//!
//! Translation of qBittorrent snapshots into metric families.

use qbittorrent_exporter::collectors::{
    collect_global_metrics, translate, QbittorrentCollector, TranslateOptions,
};
use qbittorrent_exporter::error::{ExporterError, Result};
use qbittorrent_exporter::metrics::{MetricFamily, MetricKind};
use qbittorrent_exporter::qbittorrent::types::MainData;
use qbittorrent_exporter::qbittorrent::SnapshotSource;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TORRENT_FAMILIES: [&str; 12] = [
    "qbittorrent_torrent",
    "qbittorrent_torrent_total_downloaded",
    "qbittorrent_torrent_downloaded",
    "qbittorrent_torrent_uploaded",
    "qbittorrent_torrent_total_size",
    "qbittorrent_torrent_size",
    "qbittorrent_torrent_eta",
    "qbittorrent_torrent_total_seeds",
    "qbittorrent_torrent_connected_seeds",
    "qbittorrent_torrent_total_leeches",
    "qbittorrent_torrent_connected_leeches",
    "qbittorrent_torrent_last_activity",
];

fn scenario() -> MainData {
    serde_json::from_value(json!({
        "server_state": {"alltime_dl": 100, "alltime_ul": 50},
        "torrents": {
            "abc": {
                "name": "T1", "amount_left": 20, "downloaded": 80, "uploaded": 10,
                "size": 80, "total_size": 100, "eta": 30,
                "num_complete": 5, "num_incomplete": 2, "num_seeds": 3, "num_leechs": 1,
                "last_activity": 1000, "state": "downloading", "category": "movies",
                "infohash_v1": "h1", "infohash_v2": "", "added_on": 900, "completion_on": 0
            }
        }
    }))
    .expect("Invalid scenario")
}

fn torrent(name: &str, amount_left: i64, size: i64, v1: &str, v2: &str) -> serde_json::Value {
    json!({
        "name": name, "amount_left": amount_left, "downloaded": size, "uploaded": 0,
        "size": size, "total_size": size, "eta": 0,
        "num_complete": 0, "num_incomplete": 0, "num_seeds": 0, "num_leechs": 0,
        "last_activity": 0, "state": "pausedUP", "category": "",
        "infohash_v1": v1, "infohash_v2": v2, "added_on": 0, "completion_on": 0
    })
}

fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
    families
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("Missing family {}", name))
}

fn info_label<'a>(family: &'a MetricFamily, sample: usize, label: &str) -> &'a str {
    let idx = family
        .label_names
        .iter()
        .position(|l| l == label)
        .unwrap_or_else(|| panic!("Missing label {}", label));
    &family.samples[sample].label_values[idx]
}

#[test]
fn test_scenario_translation() {
    // Given: The reference snapshot with a single torrent
    let families = translate(&scenario(), &TranslateOptions::default());

    // Then: Relevant downloaded is size - amount_left
    let downloaded = family(&families, "qbittorrent_torrent_downloaded");
    assert_eq!(downloaded.value_for("T1"), Some(60.0));

    // And: The info hash is the v1 hash
    let info = family(&families, "qbittorrent_torrent");
    assert_eq!(info_label(info, 0, "hash"), "h1");
    assert_eq!(info_label(info, 0, "state"), "downloading");
    assert_eq!(info_label(info, 0, "category"), "movies");
    assert_eq!(info_label(info, 0, "total_size_bytes"), "100");
    assert_eq!(info_label(info, 0, "added_timestamp_seconds"), "900");
    assert_eq!(info_label(info, 0, "completed_timestamp_seconds"), "0");

    // And: Global counters are duplicated into the session variants
    let global = |name: &str| family(&families, name).samples[0].value;
    assert_eq!(global("qbittorrent_global_alltime_uploaded"), 50.0);
    assert_eq!(global("qbittorrent_global_alltime_downloaded"), 100.0);
    assert_eq!(global("qbittorrent_global_session_uploaded"), 50.0);
    assert_eq!(global("qbittorrent_global_session_downloaded"), 100.0);
}

#[test]
fn test_scenario_per_torrent_values() {
    let families = translate(&scenario(), &TranslateOptions::default());
    let value = |name: &str| family(&families, name).value_for("T1");

    assert_eq!(value("qbittorrent_torrent_total_downloaded"), Some(80.0));
    assert_eq!(value("qbittorrent_torrent_uploaded"), Some(10.0));
    assert_eq!(value("qbittorrent_torrent_total_size"), Some(100.0));
    assert_eq!(value("qbittorrent_torrent_size"), Some(80.0));
    assert_eq!(value("qbittorrent_torrent_eta"), Some(30.0));
    assert_eq!(value("qbittorrent_torrent_total_seeds"), Some(5.0));
    assert_eq!(value("qbittorrent_torrent_connected_seeds"), Some(3.0));
    assert_eq!(value("qbittorrent_torrent_total_leeches"), Some(2.0));
    assert_eq!(value("qbittorrent_torrent_connected_leeches"), Some(1.0));
    assert_eq!(value("qbittorrent_torrent_last_activity"), Some(1000.0));
    assert_eq!(value("qbittorrent_torrent"), Some(1.0));
}

#[test]
fn test_family_order_and_kinds() {
    let families = translate(&scenario(), &TranslateOptions::default());
    let names: Vec<&str> = families.iter().map(|f| f.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "qbittorrent_global_alltime_uploaded",
            "qbittorrent_global_alltime_downloaded",
            "qbittorrent_global_session_uploaded",
            "qbittorrent_global_session_downloaded",
            "qbittorrent_torrent",
            "qbittorrent_torrent_total_downloaded",
            "qbittorrent_torrent_downloaded",
            "qbittorrent_torrent_uploaded",
            "qbittorrent_torrent_total_size",
            "qbittorrent_torrent_size",
            "qbittorrent_torrent_eta",
            "qbittorrent_torrent_total_seeds",
            "qbittorrent_torrent_connected_seeds",
            "qbittorrent_torrent_total_leeches",
            "qbittorrent_torrent_connected_leeches",
            "qbittorrent_torrent_last_activity",
        ]
    );

    assert_eq!(family(&families, "qbittorrent_torrent").kind, MetricKind::Info);
    assert_eq!(
        family(&families, "qbittorrent_torrent_uploaded").kind,
        MetricKind::Counter
    );
    assert_eq!(
        family(&families, "qbittorrent_torrent_size").kind,
        MetricKind::Gauge
    );
    assert_eq!(
        family(&families, "qbittorrent_torrent_last_activity").unit.as_deref(),
        Some("timestamp_seconds")
    );
}

#[test]
fn test_empty_snapshot_keeps_all_families() {
    // Given: A snapshot without torrents
    let maindata: MainData = serde_json::from_value(json!({
        "server_state": {"alltime_dl": 0, "alltime_ul": 0},
        "torrents": {}
    }))
    .unwrap();

    // When: Translating it
    let families = translate(&maindata, &TranslateOptions::default());

    // Then: Every torrent family is present and empty, globals still have one sample each
    for name in TORRENT_FAMILIES {
        assert!(family(&families, name).samples.is_empty(), "{} not empty", name);
    }
    let global_samples: usize = families
        .iter()
        .filter(|f| f.name.starts_with("qbittorrent_global"))
        .map(|f| f.samples.len())
        .sum();
    assert_eq!(global_samples, 4);
}

#[test]
fn test_one_sample_per_torrent() {
    let maindata: MainData = serde_json::from_value(json!({
        "server_state": {"alltime_dl": 0, "alltime_ul": 0},
        "torrents": {
            "a": torrent("alpha", 0, 10, "a1", ""),
            "b": torrent("beta", 5, 10, "b1", ""),
            "c": torrent("gamma", 10, 10, "", "c2")
        }
    }))
    .unwrap();

    let families = translate(&maindata, &TranslateOptions::default());

    for name in TORRENT_FAMILIES {
        assert_eq!(family(&families, name).samples.len(), 3, "{}", name);
    }
    let downloaded = family(&families, "qbittorrent_torrent_downloaded");
    assert_eq!(downloaded.value_for("alpha"), Some(10.0));
    assert_eq!(downloaded.value_for("beta"), Some(5.0));
    assert_eq!(downloaded.value_for("gamma"), Some(0.0));
}

#[test]
fn test_info_hash_falls_back_to_v2() {
    let maindata: MainData = serde_json::from_value(json!({
        "server_state": {"alltime_dl": 0, "alltime_ul": 0},
        "torrents": {
            "a": torrent("v2-only", 0, 1, "", "c2"),
            "b": torrent("no-hash", 0, 1, "", "")
        }
    }))
    .unwrap();

    let families = translate(&maindata, &TranslateOptions::default());
    let info = family(&families, "qbittorrent_torrent");

    // Torrents iterate in identifier order
    assert_eq!(info_label(info, 0, "name"), "v2-only");
    assert_eq!(info_label(info, 0, "hash"), "c2");
    assert_eq!(info_label(info, 1, "name"), "no-hash");
    assert_eq!(info_label(info, 1, "hash"), "");
}

#[test]
fn test_session_counters_used_when_present() {
    let maindata: MainData = serde_json::from_value(json!({
        "server_state": {
            "alltime_dl": 100, "alltime_ul": 50,
            "dl_info_data": 7, "up_info_data": 3
        },
        "torrents": {}
    }))
    .unwrap();

    let families = collect_global_metrics(&maindata);
    let values: Vec<f64> = families.iter().map(|f| f.samples[0].value).collect();

    assert_eq!(values, vec![50.0, 100.0, 3.0, 7.0]);
    assert!(families.iter().all(|f| f.kind == MetricKind::Counter));
    assert!(families.iter().all(|f| f.unit.as_deref() == Some("bytes")));
}

#[test]
fn test_id_label_distinguishes_duplicate_names() {
    // Given: Two torrents sharing a name
    let maindata: MainData = serde_json::from_value(json!({
        "server_state": {"alltime_dl": 0, "alltime_ul": 0},
        "torrents": {
            "aaa": torrent("same", 0, 10, "aaa", ""),
            "bbb": torrent("same", 0, 20, "bbb", "")
        }
    }))
    .unwrap();
    let options = TranslateOptions {
        torrent_id_label: true,
    };

    // When: Translating with the id label enabled
    let families = translate(&maindata, &options);

    // Then: Each sample carries both name and id
    let size = family(&families, "qbittorrent_torrent_size");
    assert_eq!(size.label_names, vec!["name".to_string(), "id".to_string()]);
    assert_eq!(
        size.samples[0].label_values,
        vec!["same".to_string(), "aaa".to_string()]
    );
    assert_eq!(
        size.samples[1].label_values,
        vec!["same".to_string(), "bbb".to_string()]
    );

    let info = family(&families, "qbittorrent_torrent");
    assert_eq!(info.label_names[..2], ["name".to_string(), "id".to_string()]);
}

#[test]
fn test_translation_is_deterministic() {
    let maindata = scenario();
    let options = TranslateOptions::default();

    assert_eq!(translate(&maindata, &options), translate(&maindata, &options));
}

struct CannedSource {
    result: fn() -> Result<MainData>,
    calls: AtomicUsize,
}

impl SnapshotSource for CannedSource {
    async fn snapshot(&self) -> Result<MainData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.result)()
    }
}

#[tokio::test]
async fn test_collector_fetches_once_per_collect() {
    let source = Arc::new(CannedSource {
        result: || Ok(scenario()),
        calls: AtomicUsize::new(0),
    });
    let collector = QbittorrentCollector::new(source.clone(), TranslateOptions::default());

    let first = collector.collect().await.expect("Collect failed");
    let second = collector.collect().await.expect("Collect failed");

    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(first, second);
    assert_eq!(first.len(), 16);
}

#[tokio::test]
async fn test_collector_propagates_fetch_errors() {
    let source = Arc::new(CannedSource {
        result: || Err(ExporterError::Auth("rejected".to_string())),
        calls: AtomicUsize::new(0),
    });
    let collector = QbittorrentCollector::new(source, TranslateOptions::default());

    let result = collector.collect().await;

    assert!(matches!(result, Err(ExporterError::Auth(_))));
}
