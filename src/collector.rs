//! Collector Layer
//!
//! The pluggable side of argus. A collector is one unit responsible for the
//! metrics of a single host subsystem; the exporter runs every registered
//! collector concurrently on each scrape.
//!
//! # Architecture
//!
//! - [`CollectorInfo`] / [`MetricSource`] / [`ErrorSource`]: the three
//!   capability traits a collector implements
//! - [`Descriptor`]: one registered collector, bundling the capabilities
//! - [`registry`]: builds the descriptor list from the built-in set and
//!   configuration overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use argus::{Exporter, registry};
//! use std::collections::BTreeMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let descriptors = registry::build_descriptors(&BTreeMap::new())?;
//! let exporter = Exporter::new(descriptors)?;
//! # Ok(())
//! # }
//! ```

pub mod loadavg;
pub mod meminfo;
pub mod registry;
mod traits;
pub mod uptime;

pub use loadavg::LoadavgCollector;
pub use meminfo::MeminfoCollector;
pub use traits::{CollectorError, CollectorInfo, Descriptor, ErrorSource, MetricSource};
pub use uptime::UptimeCollector;
