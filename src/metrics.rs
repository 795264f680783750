//! Prometheus Metrics Definitions
//!
//! The collectors translate a qBittorrent snapshot into plain [`MetricFamily`]
//! values. Nothing here is retained between scrapes: every call to [`render`]
//! writes each family's HELP and TYPE header and encodes its samples through a
//! fresh `prometheus::Registry`.
//!
//! # Metric Kinds
//!
//! - **Counter**: byte totals (exposed with a `_total` suffix)
//! - **Gauge**: point-in-time values such as sizes, peer counts and timestamps
//! - **Info**: descriptive labels with a constant value of 1 (exposed with an `_info` suffix)
//!
//! All metrics use the `qbittorrent_` namespace prefix.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Info,
}

/// One labelled value inside a [`MetricFamily`]
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Label values, in the order of the family's `label_names`
    pub label_values: Vec<String>,
    pub value: f64,
}

/// A named group of samples sharing help text, unit, kind and label names
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub unit: Option<String>,
    pub kind: MetricKind,
    pub label_names: Vec<String>,
    pub samples: Vec<MetricSample>,
}

impl MetricFamily {
    pub fn new(name: &str, help: &str, kind: MetricKind) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            unit: None,
            kind,
            label_names: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn counter(name: &str, help: &str) -> Self {
        Self::new(name, help, MetricKind::Counter)
    }

    pub fn gauge(name: &str, help: &str) -> Self {
        Self::new(name, help, MetricKind::Gauge)
    }

    pub fn info(name: &str, help: &str) -> Self {
        Self::new(name, help, MetricKind::Info)
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_labels<S: AsRef<str>>(mut self, label_names: &[S]) -> Self {
        self.label_names = label_names.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    /// Append a sample; `label_values` must line up with `label_names`
    pub fn add_sample(&mut self, label_values: Vec<String>, value: f64) {
        debug_assert_eq!(label_values.len(), self.label_names.len());
        self.samples.push(MetricSample {
            label_values,
            value,
        });
    }

    /// Metric name as it appears in the text exposition
    ///
    /// `qbittorrent_torrent_uploaded` with unit `bytes` becomes
    /// `qbittorrent_torrent_uploaded_bytes_total`.
    pub fn exposition_name(&self) -> String {
        let mut name = self.name.clone();
        if let Some(unit) = &self.unit {
            name.push('_');
            name.push_str(unit);
        }
        match self.kind {
            MetricKind::Counter => name.push_str("_total"),
            MetricKind::Info => name.push_str("_info"),
            MetricKind::Gauge => {}
        }
        name
    }

    /// Value of the sample whose first label (the torrent name) equals `label`
    pub fn value_for(&self, label: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.label_values.first().map(String::as_str) == Some(label))
            .map(|s| s.value)
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            MetricKind::Counter => "counter",
            MetricKind::Gauge | MetricKind::Info => "gauge",
        }
    }

    /// Encode this family's sample lines, without the HELP and TYPE header
    fn encode_samples(&self, name: &str) -> anyhow::Result<String> {
        let label_names: Vec<&str> = self.label_names.iter().map(String::as_str).collect();
        let vec = GaugeVec::new(Opts::new(name, self.help.clone()), &label_names)?;
        for sample in &self.samples {
            // Duplicate label sets keep the last value
            vec.with_label_values(label_refs(sample).as_slice())
                .set(sample.value);
        }

        let registry = Registry::new();
        registry.register(Box::new(vec))?;

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        let encoded = String::from_utf8(buffer)?;

        Ok(encoded
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(|line| format!("{}\n", line))
            .collect())
    }
}

fn label_refs(sample: &MetricSample) -> Vec<&str> {
    sample.label_values.iter().map(String::as_str).collect()
}

/// Render metric families in Prometheus text format
///
/// Families keep their order. A family without samples is still announced
/// with its HELP and TYPE lines. Counter values are written as given, so a
/// negative or decreasing value reaches the output unchanged.
pub fn render(families: &[MetricFamily]) -> anyhow::Result<String> {
    let mut output = String::new();
    for family in families {
        let name = family.exposition_name();
        output.push_str(&format!(
            "# HELP {} {}\n# TYPE {} {}\n",
            name,
            escape_help(&family.help),
            name,
            family.type_name()
        ));
        if !family.samples.is_empty() {
            output.push_str(&family.encode_samples(&name)?);
        }
    }
    Ok(output)
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}
