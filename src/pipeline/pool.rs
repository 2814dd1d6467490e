use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::args::PositiveUsize;
use crate::error::AppResult;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::transport::Transport;

use super::types::{RequestSpec, ResultDescriptor};

type SharedRequests = Arc<Mutex<mpsc::Receiver<RequestSpec>>>;

/// Fixed set of executors racing for requests on one shared queue.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns exactly `concurrency` executors and returns without waiting on
    /// them. Executors stop once the request queue is closed and drained, the
    /// result queue is gone, or shutdown is signalled.
    #[must_use]
    pub fn start(
        concurrency: PositiveUsize,
        transport: Arc<dyn Transport>,
        request_rx: mpsc::Receiver<RequestSpec>,
        result_tx: mpsc::Sender<ResultDescriptor>,
        shutdown_tx: &ShutdownSender,
    ) -> Self {
        let requests: SharedRequests = Arc::new(Mutex::new(request_rx));
        let mut handles = Vec::with_capacity(concurrency.get());

        for worker_id in 0..concurrency.get() {
            let executor = Executor {
                worker_id,
                transport: Arc::clone(&transport),
                requests: Arc::clone(&requests),
                results: result_tx.clone(),
                shutdown_rx: shutdown_tx.subscribe(),
            };
            handles.push(tokio::spawn(executor.run()));
        }

        Self { handles }
    }

    #[must_use]
    pub fn executor_count(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every executor to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if an executor task panicked or was aborted.
    pub async fn join(self) -> AppResult<()> {
        for handle in self.handles {
            handle.await?;
        }
        Ok(())
    }
}

struct Executor {
    worker_id: usize,
    transport: Arc<dyn Transport>,
    requests: SharedRequests,
    results: mpsc::Sender<ResultDescriptor>,
    shutdown_rx: ShutdownReceiver,
}

impl Executor {
    async fn run(mut self) {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => break,
                next = next_request(&self.requests) => next,
            };
            let Some(spec) = next else {
                break;
            };

            let index = spec.index;
            debug!(worker = self.worker_id, "Sending request {}", index);
            let outcome = tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => break,
                outcome = self.transport.round_trip(&spec) => outcome,
            };
            debug!(worker = self.worker_id, "Received response {}", index);
            drop(spec);

            let result = match outcome {
                Ok(byte_length) => ResultDescriptor::Success { index, byte_length },
                Err(error) => ResultDescriptor::Failure { index, error },
            };

            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => break,
                sent = self.results.send(result) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
        debug!(worker = self.worker_id, "Executor stopped");
    }
}

async fn next_request(requests: &Mutex<mpsc::Receiver<RequestSpec>>) -> Option<RequestSpec> {
    let mut receiver = requests.lock().await;
    receiver.recv().await
}
