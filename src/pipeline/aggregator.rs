use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::shutdown::ShutdownReceiver;

use super::types::ResultDescriptor;

/// Running totals kept by the aggregator. Only the aggregator mutates them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Results observed, successes and failures alike. Never exceeds the target.
    pub completed: u64,
    pub failures: u64,
    /// Sum of the declared lengths of successful responses.
    pub total_bytes: u64,
    /// Set when shutdown stopped the count before the target was reached.
    pub cancelled: bool,
}

impl AggregateStats {
    #[must_use]
    pub const fn successes(&self) -> u64 {
        self.completed.saturating_sub(self.failures)
    }

    fn record(&mut self, result: ResultDescriptor) {
        match result {
            ResultDescriptor::Success { index, byte_length } => {
                debug!("Request {} completed with {} bytes", index, byte_length);
                self.total_bytes = self.total_bytes.saturating_add(byte_length);
            }
            ResultDescriptor::Failure { index, error } => {
                warn!("Request {} failed: {}", index, error);
                self.failures = self.failures.saturating_add(1);
            }
        }
        self.completed = self.completed.saturating_add(1);
    }
}

/// Consumes results until exactly `target` have been observed.
///
/// A target of zero returns immediately without touching the queue. Failures
/// count toward the target. If every producer is gone before the target is
/// reached, the count cannot complete and only shutdown ends the wait.
pub async fn aggregate(
    mut result_rx: mpsc::Receiver<ResultDescriptor>,
    target: u64,
    mut shutdown_rx: ShutdownReceiver,
) -> AggregateStats {
    let mut stats = AggregateStats::default();
    if target == 0 {
        return stats;
    }

    while stats.completed < target {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                stats.cancelled = true;
                break;
            }
            received = result_rx.recv() => match received {
                Some(result) => stats.record(result),
                None => {
                    warn!(
                        "All workers stopped after {} of {} results; waiting for shutdown",
                        stats.completed, target
                    );
                    drop(shutdown_rx.recv().await);
                    stats.cancelled = true;
                    break;
                }
            }
        }
    }

    stats
}
