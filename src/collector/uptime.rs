//! Host uptime collector.
//!
//! Reads `/proc/uptime` and reports how long the host has been up.

use std::sync::Mutex;

use crate::collector::{CollectorError, CollectorInfo, ErrorSource, MetricSource};
use crate::metrics::{MetricDesc, MetricType, Sample, SampleSink};

/// Source file for uptime data.
const PROC_UPTIME: &str = "/proc/uptime";

/// Metric name for the uptime gauge.
const UPTIME_SECONDS: &str = "argus_uptime_seconds";

/// Collector for host uptime.
#[derive(Debug, Default)]
pub struct UptimeCollector {
    errors: Mutex<Vec<CollectorError>>,
}

impl UptimeCollector {
    /// Create a new uptime collector.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_errors(&self, errors: Vec<CollectorError>) {
        *self.errors.lock().expect("errors mutex poisoned") = errors;
    }
}

impl CollectorInfo for UptimeCollector {
    fn name(&self) -> &str {
        "uptime"
    }

    fn help(&self) -> &str {
        "Host uptime from /proc/uptime."
    }

    fn enabled_by_default(&self) -> bool {
        true
    }
}

#[async_trait::async_trait]
impl MetricSource for UptimeCollector {
    fn describe(&self) -> Vec<MetricDesc> {
        vec![MetricDesc::new(
            UPTIME_SECONDS,
            "Seconds since the host booted.",
            MetricType::Gauge,
        )]
    }

    async fn produce(&self, sink: &SampleSink) {
        let mut errors = Vec::new();

        match std::fs::read_to_string(PROC_UPTIME) {
            Ok(raw) => match parse_uptime(&raw) {
                Ok(seconds) => {
                    tracing::debug!(seconds, "Uptime read");
                    sink.send(Sample::new(UPTIME_SECONDS, seconds));
                }
                Err(e) => errors.push(e),
            },
            Err(e) => errors.push(e.into()),
        }

        self.record_errors(errors);
    }
}

impl ErrorSource for UptimeCollector {
    fn collected_errors(&self) -> Vec<CollectorError> {
        self.errors.lock().expect("errors mutex poisoned").clone()
    }
}

/// Parse the first field of `/proc/uptime` (uptime in seconds).
fn parse_uptime(raw: &str) -> Result<f64, CollectorError> {
    raw.split_whitespace()
        .next()
        .ok_or_else(|| CollectorError::Parse("empty uptime file".to_string()))?
        .parse::<f64>()
        .map_err(|e| CollectorError::Parse(format!("uptime field: {e}")))
}
