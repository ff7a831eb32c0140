//! Background persistence queue
//!
//! The pipeline hands finished resource batches to a worker that owns the
//! store, so a run's result never waits on the database. Delivery is
//! best-effort: batches still queued when the process dies are lost.

use crate::model::Resource;
use crate::storage::Storage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sending half of the persistence queue; cheap to clone
#[derive(Debug, Clone)]
pub struct PersistenceQueue {
    tx: mpsc::UnboundedSender<Vec<Resource>>,
}

/// Handle on the worker draining a [`PersistenceQueue`]
#[derive(Debug)]
pub struct PersistenceWorker {
    handle: JoinHandle<u64>,
}

impl PersistenceQueue {
    /// Starts a worker that owns `store` and writes every submitted batch
    ///
    /// The worker runs on the blocking pool and exits once every queue handle
    /// has been dropped and the channel is drained.
    pub fn spawn<S>(mut store: S) -> (Self, PersistenceWorker)
    where
        S: Storage + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<Resource>>();

        let handle = tokio::task::spawn_blocking(move || {
            let mut saved: u64 = 0;
            while let Some(batch) = rx.blocking_recv() {
                match store.save_resources(&batch) {
                    Ok(inserted) => {
                        saved += inserted as u64;
                        tracing::debug!(batch = batch.len(), inserted, "Persisted resources");
                    }
                    Err(e) => {
                        tracing::error!(batch = batch.len(), error = %e, "Failed to persist resources");
                    }
                }
            }
            saved
        });

        (Self { tx }, PersistenceWorker { handle })
    }

    /// Queues a batch for persistence; never blocks and never fails the caller
    pub fn submit(&self, batch: Vec<Resource>) {
        if batch.is_empty() {
            return;
        }
        let count = batch.len();
        if self.tx.send(batch).is_err() {
            tracing::warn!(count, "Persistence worker has stopped, dropping resources");
        }
    }
}

impl PersistenceWorker {
    /// Waits for the worker to drain the queue
    ///
    /// Every [`PersistenceQueue`] handle must be dropped first, otherwise this
    /// waits forever. Returns the number of rows inserted over the worker's life.
    pub async fn finish(self) -> u64 {
        match self.handle.await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(error = %e, "Persistence worker panicked");
                0
            }
        }
    }
}
