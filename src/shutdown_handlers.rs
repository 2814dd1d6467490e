use tokio::task::JoinHandle;
use tracing::warn;

use pipeload::shutdown::{ShutdownReceiver, ShutdownSender};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Turns Ctrl+C (and SIGTERM on unix) into a pipeline shutdown.
///
/// `shutdown_rx` is taken from the caller so a shutdown raised elsewhere
/// before the task is first polled still ends it.
pub fn setup_signal_shutdown_handler(
    shutdown_tx: &ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
) -> JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.recv() => {}
            name = termination_signal() => {
                warn!("Received {}; cancelling run", name);
                drop(shutdown_tx.send(()));
            }
        }
    })
}

#[cfg(unix)]
async fn termination_signal() -> &'static str {
    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(err) => {
            warn!("Failed to register SIGTERM handler: {}", err);
            return interrupt_signal().await;
        }
    };
    tokio::select! {
        name = interrupt_signal() => name,
        _ = term.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> &'static str {
    interrupt_signal().await
}

async fn interrupt_signal() -> &'static str {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
    "Ctrl+C"
}
