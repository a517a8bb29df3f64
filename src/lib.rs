//! Argus - Multi-Collector Host Exporter
//!
//! Argus exposes the health and counters of a multi-subsystem host through
//! one unified metrics endpoint. On each scrape it runs every registered
//! collector in parallel, merges their samples into one stream, and derives
//! an overall liveness signal without letting a single failing collector
//! abort or corrupt the scrape.
//!
//! # Architecture
//!
//! - **Collectors**: per-subsystem metric production with separate error
//!   reporting, so a collector can partially succeed
//! - **Exporter**: the orchestration core (fan-out, join barrier, failure
//!   tally, liveness arithmetic)
//! - **Metrics**: the sample data model and text exposition rendering
//! - **Server**: thin axum layer serving `/metrics` and `/healthz`
//!
//! # Example
//!
//! ```rust,no_run
//! use argus::{Exporter, registry};
//! use std::collections::BTreeMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let descriptors = registry::build_descriptors(&BTreeMap::new())?;
//!     let exporter = Exporter::new(descriptors)?;
//!
//!     let samples = exporter.collect().await?;
//!     println!("{}", argus::encode_text(&exporter.describe(), &samples));
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod exporter;
pub mod metrics;
pub mod server;

pub use collector::{
    CollectorError, CollectorInfo, Descriptor, ErrorSource, MetricSource, registry,
};
pub use config::{AppConfig, ConfigError, ServerConfig};
pub use exporter::{Exporter, ExporterError, NAMESPACE};
pub use metrics::{MetricDesc, MetricType, Sample, SampleSink, encode_text};
