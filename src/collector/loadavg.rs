//! Load average collector.
//!
//! Reads `/proc/loadavg` and reports the 1/5/15 minute load averages.

use std::sync::Mutex;

use crate::collector::{CollectorError, CollectorInfo, ErrorSource, MetricSource};
use crate::metrics::{MetricDesc, MetricType, Sample, SampleSink};

/// Source file for load averages.
const PROC_LOADAVG: &str = "/proc/loadavg";

/// Metric names for the three load windows, in file order.
const LOAD_METRICS: [(&str, &str); 3] = [
    ("argus_load1", "1m load average."),
    ("argus_load5", "5m load average."),
    ("argus_load15", "15m load average."),
];

/// Collector for the kernel load averages.
#[derive(Debug, Default)]
pub struct LoadavgCollector {
    errors: Mutex<Vec<CollectorError>>,
}

impl LoadavgCollector {
    /// Create a new load average collector.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_errors(&self, errors: Vec<CollectorError>) {
        *self.errors.lock().expect("errors mutex poisoned") = errors;
    }
}

impl CollectorInfo for LoadavgCollector {
    fn name(&self) -> &str {
        "loadavg"
    }

    fn help(&self) -> &str {
        "Load averages from /proc/loadavg."
    }

    fn enabled_by_default(&self) -> bool {
        true
    }
}

#[async_trait::async_trait]
impl MetricSource for LoadavgCollector {
    fn describe(&self) -> Vec<MetricDesc> {
        LOAD_METRICS
            .iter()
            .map(|(name, help)| MetricDesc::new(*name, *help, MetricType::Gauge))
            .collect()
    }

    async fn produce(&self, sink: &SampleSink) {
        let mut errors = Vec::new();

        match std::fs::read_to_string(PROC_LOADAVG) {
            Ok(raw) => match parse_loadavg(&raw) {
                Ok(loads) => {
                    for ((name, _), value) in LOAD_METRICS.iter().zip(loads) {
                        sink.send(Sample::new(*name, value));
                    }
                }
                Err(e) => errors.push(e),
            },
            Err(e) => errors.push(e.into()),
        }

        self.record_errors(errors);
    }
}

impl ErrorSource for LoadavgCollector {
    fn collected_errors(&self) -> Vec<CollectorError> {
        self.errors.lock().expect("errors mutex poisoned").clone()
    }
}

/// Parse the first three fields of `/proc/loadavg`.
fn parse_loadavg(raw: &str) -> Result<[f64; 3], CollectorError> {
    let mut fields = raw.split_whitespace();
    let mut loads = [0.0; 3];

    for (i, load) in loads.iter_mut().enumerate() {
        let field = fields
            .next()
            .ok_or_else(|| CollectorError::Parse(format!("missing loadavg field {i}")))?;
        *load = field
            .parse::<f64>()
            .map_err(|e| CollectorError::Parse(format!("loadavg field {i}: {e}")))?;
    }

    Ok(loads)
}
