//! Deferred, cancellable one-shot timers for offer expiration.
//!
//! Each issued offer arms exactly one timer keyed by its entry id. Firing runs
//! the supplied job; cancelling (on release or fulfillment) drops it. The job
//! itself re-reads the entry before mutating, so a timer that fires late or
//! after cancellation raced it is harmless.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::util::serde::EntryId;

/// Abstraction for spawning futures on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Boxed job run when a timer fires.
pub type ExpiryJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Registry of pending expiration timers.
pub struct ExpirationTimers<S> {
    spawner: S,
    pending: Arc<Mutex<HashMap<EntryId, oneshot::Sender<()>>>>,
}

impl<S: Spawn> ExpirationTimers<S> {
    /// Create an empty registry spawning timers on `spawner`.
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `job` after `delay` unless cancelled first.
    ///
    /// Arming an entry that already has a pending timer replaces (and cancels)
    /// the earlier one.
    pub fn arm(&self, entry_id: EntryId, delay: Duration, job: ExpiryJob) {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        if self.pending.lock().insert(entry_id, cancel_tx).is_some() {
            tracing::debug!(entry_id, "replaced pending expiration timer");
        }

        let deadline = tokio::time::Instant::now() + delay;
        let pending = Arc::clone(&self.pending);
        self.spawner.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep_until(deadline) => {}
                _ = cancel_rx => {
                    tracing::trace!(entry_id, "expiration timer cancelled");
                    return;
                }
            }
            pending.lock().remove(&entry_id);
            tracing::debug!(entry_id, "expiration timer fired");
            job.await;
        });
    }

    /// Cancel a pending timer. Returns whether one was pending.
    pub fn cancel(&self, entry_id: EntryId) -> bool {
        self.pending
            .lock()
            .remove(&entry_id)
            .is_some_and(|tx| tx.send(()).is_ok())
    }

    /// Cancel every pending timer, returning how many were dropped.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.pending.lock().drain().collect();
        let count = drained.len();
        for (_, tx) in drained {
            let _ = tx.send(());
        }
        count
    }

    /// Number of timers armed but not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Spawn an arbitrary future on the registry's spawner.
    pub(crate) fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawner.spawn(fut);
    }
}
