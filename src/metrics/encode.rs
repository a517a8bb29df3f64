//! Prometheus text exposition rendering.
//!
//! Turns the output of one scrape cycle (`describe()` descriptors plus
//! `collect()` samples) into the text format scrape clients expect:
//! `# HELP` / `# TYPE` header lines per metric, then one line per sample.

use std::collections::HashMap;

use crate::metrics::{MetricDesc, Sample};

/// Render descriptors and samples as the Prometheus text exposition format.
///
/// Samples are grouped by metric name in first-seen order. Metrics with a
/// matching descriptor get `# HELP` and `# TYPE` headers; samples without one
/// are rendered bare.
pub fn encode_text(descs: &[MetricDesc], samples: &[Sample]) -> String {
    let by_name: HashMap<&str, &MetricDesc> =
        descs.iter().map(|d| (d.name.as_str(), d)).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&Sample>> = HashMap::new();
    for sample in samples {
        grouped
            .entry(sample.name.as_str())
            .or_insert_with(|| {
                order.push(sample.name.as_str());
                Vec::new()
            })
            .push(sample);
    }

    let mut out = String::new();
    for name in order {
        if let Some(desc) = by_name.get(name) {
            out.push_str(&format!("# HELP {} {}\n", name, escape_help(&desc.help)));
            out.push_str(&format!("# TYPE {} {}\n", name, desc.metric_type.as_ref()));
        }
        for sample in &grouped[name] {
            out.push_str(&render_sample(sample));
        }
    }
    out
}

fn render_sample(sample: &Sample) -> String {
    if sample.labels.is_empty() {
        return format!("{} {}\n", sample.name, sample.value);
    }

    let labels = sample
        .labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}{{{}}} {}\n", sample.name, labels, sample.value)
}

/// Escape backslash and newline in help text.
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Escape backslash, double quote, and newline in label values.
fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricType;

    #[test]
    fn test_encode_with_headers() {
        let descs = vec![MetricDesc::new(
            "argus_up",
            "Whether the host is currently up.",
            MetricType::Gauge,
        )];
        let samples = vec![Sample::new("argus_up", 1.0)];

        let text = encode_text(&descs, &samples);
        assert_eq!(
            text,
            "# HELP argus_up Whether the host is currently up.\n\
             # TYPE argus_up gauge\n\
             argus_up 1\n"
        );
    }

    #[test]
    fn test_encode_labeled_samples_grouped() {
        let descs = vec![
            MetricDesc::new("argus_collector_up", "Collector health.", MetricType::Gauge)
                .with_label("collector"),
        ];
        let samples = vec![
            Sample::new("argus_collector_up", 1.0).with_label("collector", "loadavg"),
            Sample::new("argus_collector_up", 0.0).with_label("collector", "meminfo"),
        ];

        let text = encode_text(&descs, &samples);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "argus_collector_up{collector=\"loadavg\"} 1");
        assert_eq!(lines[3], "argus_collector_up{collector=\"meminfo\"} 0");
    }

    #[test]
    fn test_encode_without_descriptor() {
        let samples = vec![Sample::new("argus_load1", 0.42)];
        let text = encode_text(&[], &samples);
        assert_eq!(text, "argus_load1 0.42\n");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_help("a\\b\nc"), "a\\\\b\\nc");
        assert_eq!(escape_label_value("say \"hi\"\n"), "say \\\"hi\\\"\\n");
    }

    #[test]
    fn test_first_seen_order_kept() {
        let samples = vec![
            Sample::new("b_metric", 2.0),
            Sample::new("a_metric", 1.0),
            Sample::new("b_metric", 3.0),
        ];

        let text = encode_text(&[], &samples);
        assert_eq!(text, "b_metric 2\nb_metric 3\na_metric 1\n");
    }
}
