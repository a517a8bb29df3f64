//! Core metric data types.
//!
//! A [`MetricDesc`] declares the shape of a metric without carrying a value;
//! a [`Sample`] is one concrete observation. The split mirrors the
//! describe/collect contract of the exporter: `describe()` traffics only in
//! descriptors, `collect()` only in samples.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Metric type classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MetricType {
    /// Monotonically increasing value.
    Counter,
    /// Value that can go up and down.
    Gauge,
}

/// Declared shape of a metric: name, help text, type, and the label names
/// its samples carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDesc {
    /// Full metric name, including the namespace prefix.
    pub name: String,
    /// Human-readable help text.
    pub help: String,
    /// Counter or gauge.
    pub metric_type: MetricType,
    /// Names of the variable labels samples of this metric carry.
    pub labels: Vec<String>,
}

impl MetricDesc {
    /// Create a descriptor with no variable labels.
    pub fn new(name: impl Into<String>, help: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            metric_type,
            labels: Vec::new(),
        }
    }

    /// Add a variable label name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// One concrete observation: a metric name, label pairs, and a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Full metric name, including the namespace prefix.
    pub name: String,
    /// Label key/value pairs, in emission order.
    pub labels: Vec<(String, String)>,
    /// Observed value.
    pub value: f64,
}

impl Sample {
    /// Create an unlabeled sample.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            value,
        }
    }

    /// Attach a label pair.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Look up a label value by key.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
