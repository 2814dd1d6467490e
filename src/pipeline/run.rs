use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::AppResult;
use crate::shutdown::{ShutdownReceiver, ShutdownSender, spawn_deadline};
use crate::transport::Transport;

use super::aggregator::aggregate;
use super::generator::{RequestSequence, spawn_generator};
use super::pool::WorkerPool;
use super::request::RequestFactory;

/// Slots per handoff queue. Tokio channels cannot be zero-sized, so one slot
/// is the closest to a rendezvous: at most one in-flight handoff per queue.
pub const HANDOFF_CAPACITY: usize = 1;

/// Totals of one run plus the wall-clock span measured around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: u64,
    pub completed: u64,
    pub failures: u64,
    pub total_bytes: u64,
    pub concurrency: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl RunSummary {
    /// Wall-clock time divided by completed results.
    ///
    /// This is a throughput figure, not a per-request latency: it folds in
    /// startup, outliers and overlap between workers. `None` when nothing
    /// completed.
    #[must_use]
    pub fn average(&self) -> Option<Duration> {
        let nanos = self.elapsed.as_nanos().checked_div(u128::from(self.completed))?;
        Some(Duration::from_nanos(
            u64::try_from(nanos).unwrap_or(u64::MAX),
        ))
    }
}

/// Runs the generator, the worker pool and the aggregator to completion.
///
/// The clock starts right before the generator and pool are launched and
/// stops when the aggregator returns. Per-request failures never surface here;
/// they are counted in the summary.
///
/// `shutdown_rx` must be subscribed before any shutdown trigger is armed. A
/// shutdown it already holds is replayed once the generator and executors
/// have subscribed, so no stage misses it.
///
/// # Errors
///
/// Returns an error only if a background task panicked.
pub async fn run_pipeline<F>(
    config: &PipelineConfig,
    factory: F,
    transport: Arc<dyn Transport>,
    shutdown_tx: &ShutdownSender,
    shutdown_rx: ShutdownReceiver,
) -> AppResult<RunSummary>
where
    F: RequestFactory + 'static,
{
    let (request_tx, request_rx) = mpsc::channel(HANDOFF_CAPACITY);
    let (result_tx, result_rx) = mpsc::channel(HANDOFF_CAPACITY);

    info!(
        "Starting {} requests against {} with {} workers",
        config.requests,
        config.target.url,
        config.concurrency.get()
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let generator = spawn_generator(
        RequestSequence::new(factory, config.requests),
        request_tx,
        shutdown_tx,
    );
    let pool = WorkerPool::start(
        config.concurrency,
        transport,
        request_rx,
        result_tx,
        shutdown_tx,
    );
    // A shutdown sent before the stages subscribed is replayed to them.
    if !shutdown_rx.is_empty() {
        drop(shutdown_tx.send(()));
    }
    let deadline = config
        .deadline
        .map(|deadline| spawn_deadline(deadline, shutdown_tx));
    let stats = aggregate(result_rx, config.requests, shutdown_rx).await;
    let elapsed = start.elapsed();

    if let Some(handle) = deadline {
        handle.abort();
    }
    let emitted = generator.await?;
    pool.join().await?;

    if stats.cancelled {
        warn!(
            "Run cancelled after {} of {} results ({} requests dispatched)",
            stats.completed, config.requests, emitted
        );
    }

    Ok(RunSummary {
        requested: config.requests,
        completed: stats.completed,
        failures: stats.failures,
        total_bytes: stats.total_bytes,
        concurrency: config.concurrency.get(),
        started_at,
        elapsed,
        cancelled: stats.cancelled,
    })
}
