//! Metric Sample Model
//!
//! The data types every layer of argus speaks:
//!
//! - [`MetricDesc`]: the declared shape of a metric (name, help, type, labels)
//! - [`Sample`]: one concrete observation produced during a scrape
//! - [`SampleSink`]: the shared destination concurrent collector tasks write to
//! - [`encode_text`]: Prometheus text exposition rendering for the serving layer

mod encode;
mod sink;
mod types;

pub use encode::encode_text;
pub use sink::SampleSink;
pub use types::{MetricDesc, MetricType, Sample};
