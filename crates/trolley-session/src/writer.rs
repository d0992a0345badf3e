//! # Snapshot Writer
//!
//! Persists committed carts off the operation path.
//!
//! ```text
//! commit ──Save(cart)──┐
//! commit ──Save(cart)──┤   unbounded mpsc    ┌────────────────────────┐
//! flush  ──Flush(tx)───┴───────────────────► │ writer task            │
//!                                            │ one save at a time,    │
//!                                            │ in commit order        │
//!                                            └───────────┬────────────┘
//!                                                        ▼
//!                                                  CartSnapshots
//! ```
//!
//! A failed save is logged and dropped. The next commit writes the whole cart
//! again, so nothing is lost for longer than one operation.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use trolley_core::Cart;
use trolley_store::CartSnapshots;

enum WriteCommand {
    Save(Arc<Cart>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer task.
///
/// The task exits once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl std::fmt::Debug for WriteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteCommand::Save(cart) => f.debug_tuple("Save").field(&cart.len()).finish(),
            WriteCommand::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl SnapshotWriter {
    /// Spawns the writer task on the current tokio runtime.
    pub(crate) fn spawn(snapshots: CartSnapshots) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(snapshots, rx));
        SnapshotWriter { tx }
    }

    /// Queues a save. Never waits.
    pub(crate) fn enqueue(&self, cart: Arc<Cart>) {
        if self.tx.send(WriteCommand::Save(cart)).is_err() {
            warn!("Snapshot writer is gone; cart change not persisted");
        }
    }

    /// Waits until every save queued before this call has been attempted.
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run(snapshots: CartSnapshots, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    debug!(key = %snapshots.key(), "Snapshot writer started");

    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Save(cart) => match snapshots.save(&cart).await {
                Ok(()) => debug!(items = cart.len(), "Cart snapshot persisted"),
                Err(e) => warn!(
                    key = %snapshots.key(),
                    error = %e,
                    "Failed to persist cart snapshot"
                ),
            },
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!(key = %snapshots.key(), "Snapshot writer stopped");
}
