use std::iter::FusedIterator;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::shutdown::ShutdownSender;

use super::request::RequestFactory;
use super::types::RequestSpec;

/// Lazy, finite sequence of the requests for indices `0..total`.
///
/// Indices whose construction fails are logged and skipped, so fewer than
/// `total` specs may be yielded. Once exhausted it stays exhausted.
#[derive(Debug)]
pub struct RequestSequence<F> {
    factory: F,
    next_index: u64,
    total: u64,
}

impl<F> RequestSequence<F>
where
    F: RequestFactory,
{
    #[must_use]
    pub const fn new(factory: F, total: u64) -> Self {
        Self {
            factory,
            next_index: 0,
            total,
        }
    }
}

impl<F> Iterator for RequestSequence<F>
where
    F: RequestFactory,
{
    type Item = RequestSpec;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index < self.total {
            let index = self.next_index;
            self.next_index = index.saturating_add(1);
            match self.factory.build(index) {
                Ok(spec) => return Some(spec),
                Err(err) => warn!("Skipping request {}: {}", index, err),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total.saturating_sub(self.next_index);
        (0, usize::try_from(remaining).ok())
    }
}

impl<F> FusedIterator for RequestSequence<F> where F: RequestFactory {}

/// Feeds the sequence into the request queue. Dropping the sender at the end
/// of the task is the end-of-sequence signal. Resolves to the number of
/// requests handed off.
pub fn spawn_generator<F>(
    sequence: RequestSequence<F>,
    request_tx: mpsc::Sender<RequestSpec>,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<u64>
where
    F: RequestFactory + 'static,
{
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut emitted: u64 = 0;
        for spec in sequence {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!("Generator cancelled after {} requests", emitted);
                    break;
                }
                sent = request_tx.send(spec) => {
                    if sent.is_err() {
                        debug!("Request queue closed after {} requests", emitted);
                        break;
                    }
                    emitted = emitted.saturating_add(1);
                }
            }
        }
        emitted
    })
}
