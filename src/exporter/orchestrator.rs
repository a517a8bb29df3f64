//! The exporter orchestrator.
//!
//! Owns the immutable descriptor list and the process-lifetime scrape
//! counters, and exposes the two-operation contract the serving layer
//! consumes: [`Exporter::describe`] declares metric shapes, never values;
//! [`Exporter::collect`] runs one full scrape cycle.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::task::JoinSet;

use crate::collector::Descriptor;
use crate::exporter::engine;
use crate::exporter::tally::FailureTally;
use crate::metrics::{MetricDesc, MetricType, Sample, SampleSink};

/// Namespace prefix of every orchestration-level metric.
pub const NAMESPACE: &str = "argus";

/// Errors from exporter registration and scrape orchestration.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// A collector was registered with an empty name.
    #[error("collector name must not be empty")]
    EmptyCollectorName,

    /// Two collectors were registered under the same name.
    #[error("duplicate collector name: {0}")]
    DuplicateCollector(String),

    /// Configuration referenced a collector that does not exist.
    #[error("unknown collector: {0}")]
    UnknownCollector(String),

    /// A collector task died before reaching the join barrier. Fatal to the
    /// invocation; per-collector scrape errors never surface here.
    #[error("collector task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The orchestration-level metric descriptors, built once per exporter.
#[derive(Debug)]
pub(crate) struct ScrapeMetrics {
    pub(crate) scrapes_total: MetricDesc,
    pub(crate) scrape_errors_total: MetricDesc,
    pub(crate) up: MetricDesc,
    pub(crate) scrape_duration: MetricDesc,
    pub(crate) collector_up: MetricDesc,
}

impl ScrapeMetrics {
    pub(crate) fn new() -> Self {
        Self {
            scrapes_total: MetricDesc::new(
                format!("{NAMESPACE}_scrapes_total"),
                "Total number of times the exporter has been scraped.",
                MetricType::Counter,
            ),
            scrape_errors_total: MetricDesc::new(
                format!("{NAMESPACE}_scrape_errors_total"),
                "Total number of collector scrapes that reported errors.",
                MetricType::Counter,
            ),
            up: MetricDesc::new(
                format!("{NAMESPACE}_up"),
                "Whether the monitored host is currently up.",
                MetricType::Gauge,
            ),
            scrape_duration: MetricDesc::new(
                format!("{NAMESPACE}_scrape_duration_seconds"),
                "Time it took for a collector's scrape to complete.",
                MetricType::Gauge,
            )
            .with_label("collector"),
            collector_up: MetricDesc::new(
                format!("{NAMESPACE}_collector_up"),
                "Whether the collector's last scrape was successful (1 = successful, 0 = unsuccessful).",
                MetricType::Gauge,
            )
            .with_label("collector"),
        }
    }
}

/// Runs every registered collector concurrently on each scrape and merges
/// their samples with the orchestration-level metrics.
///
/// Construction validates the descriptor list; afterwards the exporter is
/// immutable and safe to share behind an `Arc`. Concurrent `collect()`
/// invocations are allowed: the scrape counters are atomic and everything
/// else in a cycle is invocation-local.
#[derive(Debug)]
pub struct Exporter {
    descriptors: Vec<Descriptor>,
    metrics: Arc<ScrapeMetrics>,
    scrapes_total: AtomicU64,
    scrape_errors_total: AtomicU64,
}

impl Exporter {
    /// Register the descriptor list.
    ///
    /// Fails fast, before any scrape, on an empty or duplicate collector
    /// name.
    pub fn new(descriptors: Vec<Descriptor>) -> Result<Self, ExporterError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            let name = descriptor.info().name();
            if name.is_empty() {
                return Err(ExporterError::EmptyCollectorName);
            }
            if !seen.insert(name.to_string()) {
                return Err(ExporterError::DuplicateCollector(name.to_string()));
            }
        }

        Ok(Self {
            descriptors,
            metrics: Arc::new(ScrapeMetrics::new()),
            scrapes_total: AtomicU64::new(0),
            scrape_errors_total: AtomicU64::new(0),
        })
    }

    /// Number of registered collectors.
    pub fn collector_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Declare the shapes of every metric a scrape can emit: the five
    /// orchestration-level metrics, then each collector's own. Non-blocking;
    /// no values are produced.
    pub fn describe(&self) -> Vec<MetricDesc> {
        let mut descs = vec![
            self.metrics.scrapes_total.clone(),
            self.metrics.scrape_errors_total.clone(),
            self.metrics.up.clone(),
            self.metrics.scrape_duration.clone(),
            self.metrics.collector_up.clone(),
        ];
        for descriptor in &self.descriptors {
            descs.extend(descriptor.source().describe());
        }
        descs
    }

    /// Run one full scrape cycle and return its samples.
    ///
    /// Spawns one task per collector, blocks until every task has finished
    /// (there is no partial result and no per-collector deadline: the cycle
    /// takes as long as the slowest collector), then derives the aggregate
    /// metrics. A collector reporting errors only affects its own up gauge
    /// and the failure count; a collector task dying outright aborts the
    /// invocation with [`ExporterError::Task`].
    ///
    /// The scrape counter counts attempted cycles: it is incremented before
    /// any outcome is known. With zero registered collectors the cycle emits
    /// only orchestration-level samples and reports the host down, since no
    /// collector succeeded.
    pub async fn collect(&self) -> Result<Vec<Sample>, ExporterError> {
        let scrapes = self.scrapes_total.fetch_add(1, Ordering::Relaxed) + 1;

        let (sink, mut rx) = SampleSink::channel();
        sink.send(Sample::new(&self.metrics.scrapes_total.name, scrapes as f64));

        let tally = FailureTally::with_capacity(self.descriptors.len());
        let mut tasks = JoinSet::new();
        for descriptor in &self.descriptors {
            tasks.spawn(engine::run_descriptor(
                descriptor.clone(),
                Arc::clone(&self.metrics),
                sink.clone(),
                tally.signal_handle(),
            ));
        }

        // Join barrier: no early return with partial results.
        while let Some(joined) = tasks.join_next().await {
            joined?;
        }

        let failed = tally.drain();
        let errors_total = self
            .scrape_errors_total
            .fetch_add(failed as u64, Ordering::Relaxed)
            + failed as u64;
        sink.send(Sample::new(
            &self.metrics.scrape_errors_total.name,
            errors_total as f64,
        ));

        // At least one collector succeeded means the host is reachable;
        // zero registered collectors therefore reads as down.
        let up = if failed < self.descriptors.len() {
            1.0
        } else {
            0.0
        };
        sink.send(Sample::new(&self.metrics.up.name, up));
        drop(sink);

        let mut samples = Vec::new();
        while let Some(sample) = rx.recv().await {
            samples.push(sample);
        }

        tracing::debug!(
            scrape = scrapes,
            collectors = self.descriptors.len(),
            failed,
            samples = samples.len(),
            "Scrape cycle complete"
        );
        Ok(samples)
    }
}
