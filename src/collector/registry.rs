//! Startup collector registration.
//!
//! Builds the descriptor list the exporter will own, applying configuration
//! overrides on top of each collector's default-enabled flag. Runs once at
//! process startup; the resulting list is immutable afterwards.

use std::collections::BTreeMap;

use crate::collector::{Descriptor, LoadavgCollector, MeminfoCollector, UptimeCollector};
use crate::exporter::ExporterError;

/// Build descriptors for the built-in collector set.
///
/// `overrides` maps collector names to an explicit enabled flag; collectors
/// not mentioned follow their `enabled_by_default()`. An override naming an
/// unknown collector is a registration error, surfaced here rather than
/// discovered mid-scrape.
pub fn build_descriptors(
    overrides: &BTreeMap<String, bool>,
) -> Result<Vec<Descriptor>, ExporterError> {
    let builtins = vec![
        Descriptor::from_collector(UptimeCollector::new()),
        Descriptor::from_collector(LoadavgCollector::new()),
        Descriptor::from_collector(MeminfoCollector::new()),
    ];

    for name in overrides.keys() {
        if !builtins.iter().any(|d| d.info().name() == name) {
            return Err(ExporterError::UnknownCollector(name.clone()));
        }
    }

    let mut descriptors = Vec::new();
    for descriptor in builtins {
        let name = descriptor.info().name().to_string();
        let enabled = overrides
            .get(&name)
            .copied()
            .unwrap_or_else(|| descriptor.info().enabled_by_default());

        if enabled {
            tracing::info!(collector = %name, "Collector registered");
            descriptors.push(descriptor);
        } else {
            tracing::debug!(collector = %name, "Skipping disabled collector");
        }
    }

    Ok(descriptors)
}
