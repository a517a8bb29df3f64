//! Core collector traits and types.

use std::sync::Arc;

use thiserror::Error;

use crate::metrics::{MetricDesc, SampleSink};

/// Errors a collector can report for one production run.
///
/// Variants carry rendered messages rather than source errors so the
/// sequence reported by [`ErrorSource::collected_errors`] can be cloned out
/// of the collector without consuming it.
#[derive(Debug, Clone, Error)]
pub enum CollectorError {
    /// Reading the subsystem source failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Subsystem output could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for CollectorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Static metadata identifying a collector.
///
/// `name()` must be stable across calls and unique within a run; it doubles
/// as the `collector` label value on the per-collector gauges.
pub trait CollectorInfo: Send + Sync {
    /// Stable identifier, also used as a metric label value.
    fn name(&self) -> &str;

    /// What the collector does.
    fn help(&self) -> &str;

    /// Whether the collector is enabled when configuration says nothing.
    fn enabled_by_default(&self) -> bool;
}

/// Metric production capability.
///
/// `produce()` performs whatever blocking work is needed to gather the
/// subsystem's samples and writes them to the sink. It returns no error
/// value: failures are reported separately through [`ErrorSource`], which
/// lets a collector emit the samples it could gather and still flag that
/// part of its work failed.
#[async_trait::async_trait]
pub trait MetricSource: Send + Sync {
    /// Declare the shapes of the metrics `produce` may emit. Must not block
    /// or perform I/O.
    fn describe(&self) -> Vec<MetricDesc>;

    /// Gather zero or more samples and write them to the sink.
    async fn produce(&self, sink: &SampleSink);
}

/// Error reporting capability.
pub trait ErrorSource: Send + Sync {
    /// The errors observed during the most recently completed `produce`
    /// call, in the order they occurred. Empty if the run was clean (or no
    /// run has happened yet).
    fn collected_errors(&self) -> Vec<CollectorError>;
}

/// One registered collector: metadata plus its two capabilities.
///
/// Descriptors are created once at startup, validated by
/// [`Exporter::new`](crate::Exporter::new), and immutable afterwards.
/// Cloning is cheap; each scrape-cycle task receives its own clone.
#[derive(Clone)]
pub struct Descriptor {
    info: Arc<dyn CollectorInfo>,
    source: Arc<dyn MetricSource>,
    errors: Arc<dyn ErrorSource>,
}

impl Descriptor {
    /// Bundle explicitly provided capabilities.
    pub fn new(
        info: Arc<dyn CollectorInfo>,
        source: Arc<dyn MetricSource>,
        errors: Arc<dyn ErrorSource>,
    ) -> Self {
        Self {
            info,
            source,
            errors,
        }
    }

    /// Build a descriptor from one value implementing all three capabilities.
    pub fn from_collector<C>(collector: C) -> Self
    where
        C: CollectorInfo + MetricSource + ErrorSource + 'static,
    {
        let collector = Arc::new(collector);
        Self {
            info: collector.clone(),
            source: collector.clone(),
            errors: collector,
        }
    }

    /// Collector metadata.
    pub fn info(&self) -> &dyn CollectorInfo {
        self.info.as_ref()
    }

    /// Metric production capability.
    pub fn source(&self) -> &dyn MetricSource {
        self.source.as_ref()
    }

    /// Error reporting capability.
    pub fn errors(&self) -> &dyn ErrorSource {
        self.errors.as_ref()
    }
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.info.name())
            .field("enabled_by_default", &self.info.enabled_by_default())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricType, Sample};

    struct StaticCollector;

    impl CollectorInfo for StaticCollector {
        fn name(&self) -> &str {
            "static"
        }

        fn help(&self) -> &str {
            "Emits one fixed gauge."
        }

        fn enabled_by_default(&self) -> bool {
            true
        }
    }

    #[async_trait::async_trait]
    impl MetricSource for StaticCollector {
        fn describe(&self) -> Vec<MetricDesc> {
            vec![MetricDesc::new("static_value", "Fixed.", MetricType::Gauge)]
        }

        async fn produce(&self, sink: &SampleSink) {
            sink.send(Sample::new("static_value", 7.0));
        }
    }

    impl ErrorSource for StaticCollector {
        fn collected_errors(&self) -> Vec<CollectorError> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_descriptor_from_collector() {
        let descriptor = Descriptor::from_collector(StaticCollector);
        assert_eq!(descriptor.info().name(), "static");
        assert!(descriptor.errors().collected_errors().is_empty());

        let (sink, mut rx) = SampleSink::channel();
        descriptor.source().produce(&sink).await;
        drop(sink);
        assert_eq!(rx.recv().await.unwrap().value, 7.0);
    }

    #[test]
    fn test_collector_error_from_io() {
        let err: CollectorError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into();
        assert!(err.to_string().contains("i/o error"));
        assert!(err.to_string().contains("no such file"));
    }
}
