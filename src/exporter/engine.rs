//! Per-descriptor task body.
//!
//! One [`run_descriptor`] call is the unit the orchestrator fans out: run
//! the collector's production, read back its errors, signal the tally on
//! failure, and emit the collector's up and duration gauges. Errors stay
//! contained here; nothing a collector reports can cancel a sibling task or
//! abort the invocation.

use std::sync::Arc;
use std::time::Instant;

use crate::collector::Descriptor;
use crate::exporter::orchestrator::ScrapeMetrics;
use crate::exporter::tally::FailureSignal;
use crate::metrics::{Sample, SampleSink};

/// Run one collector's full per-cycle sequence.
///
/// The descriptor's domain samples are written during `produce`; its up and
/// duration gauges are only emitted afterwards, once production and error
/// reporting have both completed.
pub(crate) async fn run_descriptor(
    descriptor: Descriptor,
    metrics: Arc<ScrapeMetrics>,
    sink: SampleSink,
    failures: FailureSignal,
) {
    let start = Instant::now();

    descriptor.source().produce(&sink).await;
    let errors = descriptor.errors().collected_errors();
    let name = descriptor.info().name();

    if errors.is_empty() {
        sink.send(Sample::new(&metrics.collector_up.name, 1.0).with_label("collector", name));
    } else {
        for error in &errors {
            tracing::error!(collector = %name, error = %error, "Collector scrape failed");
        }
        failures.signal();
        sink.send(Sample::new(&metrics.collector_up.name, 0.0).with_label("collector", name));
    }

    sink.send(
        Sample::new(&metrics.scrape_duration.name, start.elapsed().as_secs_f64())
            .with_label("collector", name),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{CollectorError, CollectorInfo, ErrorSource, MetricSource};
    use crate::exporter::tally::FailureTally;
    use crate::metrics::MetricDesc;

    struct FixedCollector {
        name: &'static str,
        samples: usize,
        errors: usize,
    }

    impl CollectorInfo for FixedCollector {
        fn name(&self) -> &str {
            self.name
        }

        fn help(&self) -> &str {
            "Emits a fixed number of samples and errors."
        }

        fn enabled_by_default(&self) -> bool {
            true
        }
    }

    #[async_trait::async_trait]
    impl MetricSource for FixedCollector {
        fn describe(&self) -> Vec<MetricDesc> {
            Vec::new()
        }

        async fn produce(&self, sink: &SampleSink) {
            for i in 0..self.samples {
                sink.send(Sample::new(format!("{}_value", self.name), i as f64));
            }
        }
    }

    impl ErrorSource for FixedCollector {
        fn collected_errors(&self) -> Vec<CollectorError> {
            (0..self.errors)
                .map(|i| CollectorError::Parse(format!("error {i}")))
                .collect()
        }
    }

    async fn run(collector: FixedCollector) -> (Vec<Sample>, usize) {
        let descriptor = Descriptor::from_collector(collector);
        let metrics = Arc::new(ScrapeMetrics::new());
        let (sink, mut rx) = SampleSink::channel();
        let tally = FailureTally::with_capacity(1);

        run_descriptor(descriptor, metrics, sink, tally.signal_handle()).await;

        let mut samples = Vec::new();
        while let Ok(sample) = rx.try_recv() {
            samples.push(sample);
        }
        (samples, tally.drain())
    }

    #[tokio::test]
    async fn test_clean_run_emits_up_one() {
        let (samples, failures) = run(FixedCollector {
            name: "clean",
            samples: 2,
            errors: 0,
        })
        .await;

        assert_eq!(failures, 0);
        // Domain samples first, then up, then duration.
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].name, "clean_value");
        assert_eq!(samples[2].name, "argus_collector_up");
        assert_eq!(samples[2].value, 1.0);
        assert_eq!(samples[2].label("collector"), Some("clean"));
        assert_eq!(samples[3].name, "argus_scrape_duration_seconds");
        assert!(samples[3].value >= 0.0);
    }

    #[tokio::test]
    async fn test_failed_run_signals_and_keeps_samples() {
        let (samples, failures) = run(FixedCollector {
            name: "broken",
            samples: 3,
            errors: 2,
        })
        .await;

        assert_eq!(failures, 1, "any error count signals exactly one failure");
        assert_eq!(samples.len(), 5, "domain samples survive a failed run");
        let up = samples.iter().find(|s| s.name == "argus_collector_up").unwrap();
        assert_eq!(up.value, 0.0);
    }
}
