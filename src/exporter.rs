//! Orchestration Core
//!
//! The concurrent execution engine behind every scrape: fan-out of one task
//! per registered collector, fan-in of their failure signals and durations,
//! and the arithmetic that turns per-collector outcomes into process-wide
//! liveness and counters.
//!
//! # Components
//!
//! - [`Exporter`]: owns the descriptor list and the scrape counters; exposes
//!   the describe/collect contract the serving layer consumes
//! - `engine`: per-descriptor task body (fan-out unit)
//! - `tally`: multi-producer/single-consumer failure counting

mod engine;
mod orchestrator;
mod tally;

pub use orchestrator::{Exporter, ExporterError, NAMESPACE};
