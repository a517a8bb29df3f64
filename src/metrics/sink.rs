//! Shared sample sink.
//!
//! Every collector task of a scrape cycle writes into one [`SampleSink`].
//! The sink is a thin cloneable facade over an MPSC sender: producers write
//! without coordinating with each other, the channel serializes the physical
//! writes, and the single consumer (the orchestrator) drains the merged
//! stream after the join barrier.

use tokio::sync::mpsc;

use crate::metrics::Sample;

/// Write handle to the sample stream of one scrape cycle.
///
/// Cheap to clone; one clone per collector task. Writes never block and never
/// fail the producer: once the receiving side of the cycle is gone the sample
/// is dropped, which only happens when the whole invocation was abandoned.
#[derive(Debug, Clone)]
pub struct SampleSink {
    tx: mpsc::UnboundedSender<Sample>,
}

impl SampleSink {
    /// Create a sink and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Sample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Write one sample to the stream.
    pub fn send(&self, sample: Sample) {
        if let Err(e) = self.tx.send(sample) {
            tracing::debug!(sample = %e.0.name, "Sample dropped, scrape cycle gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrent_writers_all_delivered() {
        let (sink, mut rx) = SampleSink::channel();

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..8 {
            let sink = sink.clone();
            tasks.spawn(async move {
                for j in 0..50 {
                    sink.send(Sample::new(format!("m{i}"), j as f64));
                }
            });
        }
        while tasks.join_next().await.is_some() {}
        drop(sink);

        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 8 * 50);
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_is_silent() {
        let (sink, rx) = SampleSink::channel();
        drop(rx);
        // Must not panic or block.
        sink.send(Sample::new("argus_up", 1.0));
    }

    #[tokio::test]
    async fn test_per_producer_order_preserved() {
        let (sink, mut rx) = SampleSink::channel();
        sink.send(Sample::new("first", 1.0));
        sink.send(Sample::new("second", 2.0));
        drop(sink);

        assert_eq!(rx.recv().await.unwrap().name, "first");
        assert_eq!(rx.recv().await.unwrap().name, "second");
        assert!(rx.recv().await.is_none());
    }
}
