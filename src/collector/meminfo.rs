//! Memory statistics collector.
//!
//! Reads `/proc/meminfo` and reports the core memory gauges in bytes. A
//! malformed entry is recorded as an error without suppressing the entries
//! that did parse, so a partially broken meminfo still yields samples.

use std::sync::Mutex;

use crate::collector::{CollectorError, CollectorInfo, ErrorSource, MetricSource};
use crate::metrics::{MetricDesc, MetricType, Sample, SampleSink};

/// Source file for memory statistics.
const PROC_MEMINFO: &str = "/proc/meminfo";

/// meminfo keys exported, with their metric names.
const MEM_METRICS: [(&str, &str, &str); 5] = [
    ("MemTotal", "argus_memory_total_bytes", "Total usable RAM."),
    ("MemFree", "argus_memory_free_bytes", "Unused RAM."),
    (
        "MemAvailable",
        "argus_memory_available_bytes",
        "RAM available for new workloads without swapping.",
    ),
    ("Buffers", "argus_memory_buffers_bytes", "Block device buffers."),
    ("Cached", "argus_memory_cached_bytes", "Page cache."),
];

/// Collector for host memory statistics.
#[derive(Debug, Default)]
pub struct MeminfoCollector {
    errors: Mutex<Vec<CollectorError>>,
}

impl MeminfoCollector {
    /// Create a new meminfo collector.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_errors(&self, errors: Vec<CollectorError>) {
        *self.errors.lock().expect("errors mutex poisoned") = errors;
    }
}

impl CollectorInfo for MeminfoCollector {
    fn name(&self) -> &str {
        "meminfo"
    }

    fn help(&self) -> &str {
        "Memory statistics from /proc/meminfo."
    }

    fn enabled_by_default(&self) -> bool {
        true
    }
}

#[async_trait::async_trait]
impl MetricSource for MeminfoCollector {
    fn describe(&self) -> Vec<MetricDesc> {
        MEM_METRICS
            .iter()
            .map(|(_, name, help)| MetricDesc::new(*name, *help, MetricType::Gauge))
            .collect()
    }

    async fn produce(&self, sink: &SampleSink) {
        let mut errors = Vec::new();

        match std::fs::read_to_string(PROC_MEMINFO) {
            Ok(raw) => {
                let (samples, parse_errors) = parse_meminfo(&raw);
                for sample in samples {
                    sink.send(sample);
                }
                errors.extend(parse_errors);
            }
            Err(e) => errors.push(e.into()),
        }

        self.record_errors(errors);
    }
}

impl ErrorSource for MeminfoCollector {
    fn collected_errors(&self) -> Vec<CollectorError> {
        self.errors.lock().expect("errors mutex poisoned").clone()
    }
}

/// Parse the exported keys out of a `/proc/meminfo` dump.
///
/// Returns the samples that parsed and one error per exported key whose
/// line was malformed. Keys absent from the dump are skipped silently;
/// kernels differ in which keys they expose.
fn parse_meminfo(raw: &str) -> (Vec<Sample>, Vec<CollectorError>) {
    let mut samples = Vec::new();
    let mut errors = Vec::new();

    for line in raw.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some((_, name, _)) = MEM_METRICS.iter().find(|(k, _, _)| *k == key) else {
            continue;
        };

        match parse_kibibytes(rest) {
            Ok(bytes) => samples.push(Sample::new(*name, bytes)),
            Err(e) => errors.push(CollectorError::Parse(format!("{key}: {e}"))),
        }
    }

    (samples, errors)
}

/// Parse a meminfo value field (`"  16384 kB"`) into bytes.
fn parse_kibibytes(field: &str) -> Result<f64, String> {
    let mut parts = field.split_whitespace();
    let value = parts
        .next()
        .ok_or("missing value")?
        .parse::<f64>()
        .map_err(|e| e.to_string())?;

    match parts.next() {
        Some("kB") | None => Ok(value * 1024.0),
        Some(unit) => Err(format!("unexpected unit {unit:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "MemTotal:       16315404 kB\n\
                           MemFree:         8457900 kB\n\
                           MemAvailable:   12052356 kB\n\
                           Buffers:          302852 kB\n\
                           Cached:          3817224 kB\n\
                           SwapTotal:             0 kB\n";

    #[test]
    fn test_parse_meminfo_full() {
        let (samples, errors) = parse_meminfo(FIXTURE);
        assert!(errors.is_empty());
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].name, "argus_memory_total_bytes");
        assert_eq!(samples[0].value, 16315404.0 * 1024.0);
    }

    #[test]
    fn test_parse_meminfo_partial_success() {
        let raw = "MemTotal:       16315404 kB\n\
                   MemFree:         bogus kB\n\
                   Cached:          3817224 kB\n";

        let (samples, errors) = parse_meminfo(raw);
        assert_eq!(samples.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("MemFree"));
    }

    #[test]
    fn test_parse_meminfo_skips_unknown_keys() {
        let (samples, errors) = parse_meminfo("SwapTotal: 0 kB\nHugePages_Total: 0\n");
        assert!(samples.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_parse_kibibytes_units() {
        assert_eq!(parse_kibibytes(" 4 kB").unwrap(), 4096.0);
        assert_eq!(parse_kibibytes(" 4").unwrap(), 4096.0);
        assert!(parse_kibibytes(" 4 MB").is_err());
        assert!(parse_kibibytes("").is_err());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_produce_live() {
        let collector = MeminfoCollector::new();
        let (sink, mut rx) = SampleSink::channel();

        collector.produce(&sink).await;
        drop(sink);

        assert!(collector.collected_errors().is_empty());
        let first = rx.recv().await.unwrap();
        assert!(first.name.starts_with("argus_memory_"));
        assert!(first.value > 0.0);
    }
}
