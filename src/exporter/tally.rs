//! Failure tally: multi-producer, single-consumer failure counting.
//!
//! Each collector task of a cycle signals at most one failure. The channel
//! is sized to the descriptor count so a producer can never block, and the
//! single consumer only drains after the join barrier, when no producer can
//! write anymore.

use tokio::sync::mpsc;

/// Counting channel for one scrape cycle's failure signals.
#[derive(Debug)]
pub(crate) struct FailureTally {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
}

/// Producer-side handle; one per collector task.
#[derive(Debug, Clone)]
pub(crate) struct FailureSignal {
    tx: mpsc::Sender<()>,
}

impl FailureTally {
    /// Create a tally able to absorb `producers` signals without blocking.
    pub(crate) fn with_capacity(producers: usize) -> Self {
        let (tx, rx) = mpsc::channel(producers.max(1));
        Self { tx, rx }
    }

    /// Hand out a producer handle.
    pub(crate) fn signal_handle(&self) -> FailureSignal {
        FailureSignal {
            tx: self.tx.clone(),
        }
    }

    /// Count the buffered signals.
    ///
    /// Must only be called once the join barrier guarantees every producer
    /// has finished; the producer side is treated as closed and whatever is
    /// buffered is the final count.
    pub(crate) fn drain(mut self) -> usize {
        drop(self.tx);
        let mut failures = 0;
        while self.rx.try_recv().is_ok() {
            failures += 1;
        }
        failures
    }
}

impl FailureSignal {
    /// Record one failure. Non-blocking; a tally sized to the producer count
    /// always has room for it.
    pub(crate) fn signal(self) {
        if self.tx.try_send(()).is_err() {
            tracing::warn!("Failure signal dropped, tally at capacity");
        }
    }
}
