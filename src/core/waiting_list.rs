//! The waiting list: admission, promotion, expiration, release, and fulfillment.
//!
//! Every mutating operation runs as one short transaction under a per-resource
//! async mutex, so for a given resource joins, expirations, releases and
//! promotions execute strictly one at a time while different resources proceed
//! in parallel. Each transaction re-derives availability from current state
//! before deciding anything.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::WaitingListConfig;
use crate::core::availability::{self, Availability};
use crate::core::{
    build_audit_event, Allocation, AllocationLedger, AuditAction, AuditSink, EntryStatus,
    ExpirationTimers, ExpiryJob, JoinOutcome, QueueEntry, QueuePosition, Resource,
    ResourceProvider, Spawn, WaitingListError, WaitingListStore,
};
use crate::util::clock::{Clock, TokioClock};
use crate::util::serde::{EntryId, ResourceId};

/// One async mutex per resource id in use.
///
/// A slot lives only while some writer holds or waits for it, so ids that
/// never resolve to a resource leave nothing behind.
#[derive(Default)]
struct ResourceLocks {
    locks: Mutex<HashMap<ResourceId, Arc<AsyncMutex<()>>>>,
}

impl ResourceLocks {
    async fn acquire(&self, resource_id: &str) -> ResourceGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(resource_id.to_owned()).or_default())
        };
        ResourceGuard {
            locks: self,
            resource_id: resource_id.to_owned(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Drop the slot if the map holds the only handle left.
    fn evict_idle(&self, resource_id: &str) {
        let mut locks = self.locks.lock();
        if locks
            .get(resource_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(resource_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Writer lock on one resource; releases its slot on drop.
struct ResourceGuard<'a> {
    locks: &'a ResourceLocks,
    resource_id: ResourceId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ResourceGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the strong count no longer includes this guard.
        drop(self.guard.take());
        self.locks.evict_idle(&self.resource_id);
    }
}

struct Inner<St, R, L, S> {
    config: WaitingListConfig,
    store: Mutex<St>,
    resources: R,
    ledger: L,
    clock: Arc<dyn Clock>,
    timers: ExpirationTimers<S>,
    locks: ResourceLocks,
    audit: Mutex<Option<Box<dyn AuditSink>>>,
    shutdown: AtomicBool,
}

/// First-come-first-served waiting list with time-bounded offers.
///
/// Cheap to clone; clones share state. Offer timers hold only a weak
/// reference, so dropping every clone lets pending timers lapse silently.
pub struct WaitingList<St, R, L, S> {
    inner: Arc<Inner<St, R, L, S>>,
}

impl<St, R, L, S> Clone for WaitingList<St, R, L, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn deadline(now_ms: u128, ttl: Duration) -> u128 {
    now_ms + ttl.as_millis()
}

/// Rank a requester's non-expired entry among `entries` of one resource.
fn rank_of(entries: &[QueueEntry], requester_id: &str) -> Option<QueuePosition> {
    let entry = entries
        .iter()
        .find(|e| e.requester_id == requester_id && e.status != EntryStatus::Expired)?;
    let key = entry.fifo_key();
    let ahead = |status_matches: fn(EntryStatus) -> bool| {
        entries
            .iter()
            .filter(|e| status_matches(e.status) && e.fifo_key() < key)
            .count()
    };
    Some(QueuePosition {
        entry: entry.clone(),
        rank: ahead(EntryStatus::is_queued) + 1,
        waiting_rank: ahead(|s| s == EntryStatus::Waiting) + 1,
    })
}

impl<St, R, L, S> WaitingList<St, R, L, S>
where
    S: Spawn,
{
    /// Create a waiting list driven by tokio's clock.
    pub fn new(config: WaitingListConfig, store: St, resources: R, ledger: L, spawner: S) -> Self {
        Self::with_clock(
            config,
            store,
            resources,
            ledger,
            spawner,
            Arc::new(TokioClock::new()),
        )
    }

    /// Create a waiting list reading time from `clock`.
    pub fn with_clock(
        config: WaitingListConfig,
        store: St,
        resources: R,
        ledger: L,
        spawner: S,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                store: Mutex::new(store),
                resources,
                ledger,
                clock,
                timers: ExpirationTimers::new(spawner),
                locks: ResourceLocks::default(),
                audit: Mutex::new(None),
                shutdown: AtomicBool::new(false),
            }),
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(self, audit: Box<dyn AuditSink>) -> Self {
        *self.inner.audit.lock() = Some(audit);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &WaitingListConfig {
        &self.inner.config
    }

    /// Offer timers armed and not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.pending()
    }

    /// Stop the sweeper and cancel every pending offer timer.
    ///
    /// Offers already issued keep their deadlines; availability keeps ignoring
    /// them once those pass.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::Release);
        let cancelled = self.inner.timers.cancel_all();
        tracing::info!(cancelled, "waiting list shut down");
    }
}

impl<St, R, L, S> WaitingList<St, R, L, S>
where
    St: WaitingListStore + Send + 'static,
    R: ResourceProvider,
    L: AllocationLedger,
    S: Spawn + Send + Sync + 'static,
{
    /// Join the waiting list of a resource.
    ///
    /// Grants an offer immediately when capacity remains, otherwise queues the
    /// requester behind everyone already waiting.
    ///
    /// # Errors
    ///
    /// `AlreadyQueued` if the requester holds a non-expired entry, `NotFound`
    /// for an unknown resource, `RetriesExhausted` when conflicts persist.
    pub async fn join(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<JoinOutcome, WaitingListError> {
        self.retrying("join", || self.join_once(resource_id, requester_id))
            .await
    }

    /// Current availability of a resource. Read-only.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown resource.
    pub async fn compute_availability(
        &self,
        resource_id: &str,
    ) -> Result<Availability, WaitingListError> {
        self.retrying("availability", || async move {
            let now = self.now_ms();
            self.availability_at(resource_id, now)
                .await
                .map(|(_, availability)| availability)
        })
        .await
    }

    /// Promote the oldest waiting entries into offers, up to free capacity.
    ///
    /// Returns how many entries were promoted.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown resource, `CapacityExceeded` if the
    /// pre-commit check detects an oversell.
    pub async fn promote(&self, resource_id: &str) -> Result<usize, WaitingListError> {
        self.retrying("promote", || async move {
            let _guard = self.inner.locks.acquire(resource_id).await;
            self.promote_locked(resource_id).await
        })
        .await
    }

    /// Expire an offer if it is still outstanding, then promote waiters.
    ///
    /// Invoked by offer timers. A missing entry or one that already left the
    /// offered state is a no-op returning `false`.
    ///
    /// # Errors
    ///
    /// Store or collaborator failures.
    pub async fn expire_if_still_offered(
        &self,
        entry_id: EntryId,
        resource_id: &str,
    ) -> Result<bool, WaitingListError> {
        self.retrying("expire", || self.expire_once(entry_id, resource_id))
            .await
    }

    /// Give up an outstanding offer and hand the unit to the next waiter.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown entry, `InvalidState` if the entry is not an
    /// outstanding offer for `resource_id`.
    pub async fn release(&self, resource_id: &str, entry_id: EntryId) -> Result<(), WaitingListError> {
        self.retrying("release", || self.release_once(resource_id, entry_id))
            .await
    }

    /// Convert a live offer into a committed allocation.
    ///
    /// Called by the purchase workflow once payment succeeds. The allocation is
    /// committed first and the entry marked fulfilled afterwards, both inside
    /// one per-resource transaction. Readers may briefly see the unit counted
    /// twice, never zero times. If the entry cannot be updated the allocation
    /// is voided again.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown entry, `InvalidState` if the offer is not
    /// outstanding or its deadline has passed, and ledger or store failures.
    pub async fn fulfill(
        &self,
        resource_id: &str,
        entry_id: EntryId,
    ) -> Result<Allocation, WaitingListError> {
        self.retrying("fulfill", || self.fulfill_once(resource_id, entry_id))
            .await
    }

    /// Expire every offer of a resource whose deadline has passed, then promote.
    ///
    /// Safety net for timers that were lost or lag. Returns the number of
    /// offers expired.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown resource.
    pub async fn sweep_expired(&self, resource_id: &str) -> Result<usize, WaitingListError> {
        self.retrying("sweep", || self.sweep_once(resource_id))
            .await
    }

    /// Sweep every resource that has entries.
    ///
    /// Resources that disappeared from the provider are skipped.
    ///
    /// # Errors
    ///
    /// The first non-`NotFound` failure.
    pub async fn sweep_all(&self) -> Result<usize, WaitingListError> {
        let resources = self.with_store(|s| s.resources())?;
        let mut expired = 0;
        for resource_id in resources {
            match self.sweep_expired(&resource_id).await {
                Ok(count) => expired += count,
                Err(WaitingListError::NotFound(what)) => {
                    tracing::warn!(resource_id = %resource_id, %what, "skipping sweep of unknown resource");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(expired)
    }

    /// Run [`Self::sweep_all`] every `every` on the spawner until shutdown.
    pub fn spawn_sweeper(&self, every: Duration) {
        let weak = Arc::downgrade(&self.inner);
        let first_tick = tokio::time::Instant::now() + every;
        self.inner.timers.spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if inner.shutdown.load(Ordering::Acquire) {
                    break;
                }
                let list = Self { inner };
                match list.sweep_all().await {
                    Ok(0) => {}
                    Ok(expired) => tracing::debug!(expired, "sweeper expired stale offers"),
                    Err(err) => tracing::warn!(error = %err, "offer sweep failed"),
                }
            }
            tracing::debug!("offer sweeper stopped");
        });
        tracing::info!(interval = ?every, "offer sweeper started");
    }

    /// The requester's non-expired entry and its place in line. Read-only.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn position(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<Option<QueuePosition>, WaitingListError> {
        let entries = self.with_store(|s| s.entries_for(resource_id))?;
        Ok(rank_of(&entries, requester_id))
    }

    /// Fetch an entry by id.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn entry(&self, entry_id: EntryId) -> Result<Option<QueueEntry>, WaitingListError> {
        self.with_store(|s| s.get(entry_id))
    }

    /// Every entry of a resource, first-come-first-served.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn entries(&self, resource_id: &str) -> Result<Vec<QueueEntry>, WaitingListError> {
        self.with_store(|s| s.entries_for(resource_id))
    }

    async fn join_once(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<JoinOutcome, WaitingListError> {
        let _guard = self.inner.locks.acquire(resource_id).await;

        if let Some(existing) = self.with_store(|s| s.find_active(resource_id, requester_id))? {
            tracing::debug!(
                resource_id,
                requester_id,
                entry_id = existing.id,
                status = ?existing.status,
                "join rejected: already queued"
            );
            return Err(WaitingListError::AlreadyQueued {
                resource_id: resource_id.to_owned(),
                requester_id: requester_id.to_owned(),
            });
        }

        let now = self.now_ms();
        let (mut resource, mut availability) = self.availability_at(resource_id, now).await?;

        // Capacity freed without a promotion, such as a lapsed offer not yet
        // swept or a voided allocation, goes to those already waiting.
        if availability.is_available()
            && !self.with_store(|s| s.oldest_waiting(resource_id, 1))?.is_empty()
        {
            self.promote_locked(resource_id).await?;
            (resource, availability) = self.availability_at(resource_id, now).await?;
        }

        if availability.is_available() {
            self.verify_capacity(&resource, 1, now).await?;
            let ttl = self.offer_ttl(&resource);
            let entry = self.with_store(|s| {
                let id = s.allocate_id()?;
                let entry =
                    QueueEntry::offered(id, resource_id, requester_id, now, deadline(now, ttl));
                s.insert(entry.clone())?;
                Ok(entry)
            })?;
            self.arm_expiry(&entry, ttl);
            self.record(&entry, AuditAction::Offered, None);
            tracing::info!(
                resource_id,
                requester_id,
                entry_id = entry.id,
                remaining = availability.remaining - 1,
                "offer granted on join"
            );
            return Ok(JoinOutcome {
                granted: true,
                entry,
            });
        }

        let entry = self.with_store(|s| {
            let id = s.allocate_id()?;
            let entry = QueueEntry::waiting(id, resource_id, requester_id, now);
            s.insert(entry.clone())?;
            Ok(entry)
        })?;
        self.record(&entry, AuditAction::Waiting, None);
        tracing::info!(
            resource_id,
            requester_id,
            entry_id = entry.id,
            "requester added to waiting list"
        );
        Ok(JoinOutcome {
            granted: false,
            entry,
        })
    }

    async fn expire_once(
        &self,
        entry_id: EntryId,
        resource_id: &str,
    ) -> Result<bool, WaitingListError> {
        let _guard = self.inner.locks.acquire(resource_id).await;

        let Some(mut entry) = self.with_store(|s| s.get(entry_id))? else {
            tracing::debug!(entry_id, resource_id, "expiration skipped: entry missing");
            return Ok(false);
        };
        if entry.status != EntryStatus::Offered || entry.resource_id != resource_id {
            tracing::debug!(
                entry_id,
                resource_id,
                status = ?entry.status,
                "expiration skipped: offer no longer outstanding"
            );
            return Ok(false);
        }

        entry.expire()?;
        self.with_store(|s| s.update(entry.clone()))?;
        self.inner.timers.cancel(entry_id);
        self.record(&entry, AuditAction::Expired, None);
        tracing::info!(
            entry_id,
            resource_id,
            requester_id = %entry.requester_id,
            "offer expired"
        );

        self.promote_after_free(resource_id).await?;
        Ok(true)
    }

    async fn release_once(&self, resource_id: &str, entry_id: EntryId) -> Result<(), WaitingListError> {
        let _guard = self.inner.locks.acquire(resource_id).await;

        let mut entry = self
            .with_store(|s| s.get(entry_id))?
            .ok_or_else(|| WaitingListError::NotFound(format!("entry {entry_id}")))?;
        Self::ensure_offer_of(&entry, resource_id)?;

        entry.expire()?;
        self.with_store(|s| s.update(entry.clone()))?;
        self.inner.timers.cancel(entry_id);
        self.record(&entry, AuditAction::Released, None);
        tracing::info!(
            entry_id,
            resource_id,
            requester_id = %entry.requester_id,
            "offer released"
        );

        self.promote_after_free(resource_id).await?;
        Ok(())
    }

    async fn fulfill_once(
        &self,
        resource_id: &str,
        entry_id: EntryId,
    ) -> Result<Allocation, WaitingListError> {
        let _guard = self.inner.locks.acquire(resource_id).await;

        let offered = self
            .with_store(|s| s.get(entry_id))?
            .ok_or_else(|| WaitingListError::NotFound(format!("entry {entry_id}")))?;
        Self::ensure_offer_of(&offered, resource_id)?;
        if !offered.is_live_offer(self.now_ms()) {
            return Err(WaitingListError::InvalidState(format!(
                "offer for entry {entry_id} has expired"
            )));
        }

        let mut fulfilled = offered;
        fulfilled.fulfill()?;

        // The entry stays offered until the allocation exists, so lock-free
        // availability reads count the unit throughout.
        let allocation = self
            .inner
            .ledger
            .commit(resource_id, &fulfilled.requester_id)
            .await?;

        if let Err(err) = self.with_store(|s| s.update(fulfilled.clone())) {
            tracing::error!(
                entry_id,
                resource_id,
                allocation_id = %allocation.id,
                error = %err,
                "could not mark offer fulfilled, voiding allocation"
            );
            if let Err(void_err) = self.inner.ledger.void(allocation.id).await {
                tracing::error!(
                    allocation_id = %allocation.id,
                    error = %void_err,
                    "allocation void failed"
                );
            }
            return Err(err);
        }

        self.inner.timers.cancel(entry_id);
        self.record(
            &fulfilled,
            AuditAction::Fulfilled,
            Some(allocation.id.to_string()),
        );
        tracing::info!(
            entry_id,
            resource_id,
            requester_id = %fulfilled.requester_id,
            allocation_id = %allocation.id,
            "offer fulfilled"
        );
        Ok(allocation)
    }

    async fn sweep_once(&self, resource_id: &str) -> Result<usize, WaitingListError> {
        let _guard = self.inner.locks.acquire(resource_id).await;

        let now = self.now_ms();
        let stale = self.with_store(|s| s.stale_offers(resource_id, now))?;
        let mut expired = 0;
        for mut entry in stale {
            entry.expire()?;
            self.with_store(|s| s.update(entry.clone()))?;
            self.inner.timers.cancel(entry.id);
            self.record(&entry, AuditAction::Expired, Some("sweep".into()));
            expired += 1;
        }
        if expired > 0 {
            tracing::info!(resource_id, expired, "swept stale offers");
        }

        self.promote_after_free(resource_id).await?;
        Ok(expired)
    }

    /// Promote with the resource lock already held.
    async fn promote_locked(&self, resource_id: &str) -> Result<usize, WaitingListError> {
        let now = self.now_ms();
        let (resource, availability) = self.availability_at(resource_id, now).await?;
        let free = availability.free_units();
        if free == 0 {
            tracing::debug!(resource_id, remaining = availability.remaining, "no capacity to promote into");
            return Ok(0);
        }

        let batch = self.with_store(|s| s.oldest_waiting(resource_id, free))?;
        if batch.is_empty() {
            return Ok(0);
        }
        self.verify_capacity(&resource, batch.len(), now).await?;

        let ttl = self.offer_ttl(&resource);
        let expires_at = deadline(now, ttl);
        let mut promoted = Vec::with_capacity(batch.len());
        let written = self.with_store(|s| {
            for mut entry in batch {
                entry.offer(expires_at)?;
                s.update(entry.clone())?;
                promoted.push(entry);
            }
            Ok(())
        });

        // Arm whatever was written even if a later write failed.
        for entry in &promoted {
            self.arm_expiry(entry, ttl);
            self.record(entry, AuditAction::Promoted, None);
            tracing::info!(
                resource_id,
                entry_id = entry.id,
                requester_id = %entry.requester_id,
                "waiting entry promoted to offer"
            );
        }
        written?;
        Ok(promoted.len())
    }

    /// Promotion following a committed capacity-freeing write, lock held.
    ///
    /// Conflicts are retried here rather than by re-running the caller, whose
    /// write has already landed.
    async fn promote_after_free(&self, resource_id: &str) -> Result<usize, WaitingListError> {
        let promoted = self
            .retrying("promote", || self.promote_locked(resource_id))
            .await?;
        if promoted > 0 {
            tracing::debug!(resource_id, promoted, "promoted after capacity freed");
        }
        Ok(promoted)
    }

    async fn availability_at(
        &self,
        resource_id: &str,
        now_ms: u128,
    ) -> Result<(Resource, Availability), WaitingListError> {
        availability::compute(&self.inner.resources, &self.inner.ledger, resource_id, || {
            self.with_store(|s| s.live_offer_count(resource_id, now_ms))
        })
        .await
    }

    /// Re-read capacity immediately before committing `additional` offers.
    async fn verify_capacity(
        &self,
        resource: &Resource,
        additional: usize,
        now_ms: u128,
    ) -> Result<(), WaitingListError> {
        let (_, fresh) = self.availability_at(&resource.id, now_ms).await?;
        if fresh.free_units() >= additional {
            return Ok(());
        }
        let err = WaitingListError::CapacityExceeded {
            resource_id: resource.id.clone(),
            total_units: fresh.total_units,
            committed: fresh.committed_count,
            live_offers: fresh.active_offer_count,
            requested: additional,
        };
        tracing::error!(
            resource_id = %resource.id,
            error = %err,
            "refusing to oversell: per-resource serialization was violated"
        );
        Err(err)
    }

    fn ensure_offer_of(entry: &QueueEntry, resource_id: &str) -> Result<(), WaitingListError> {
        if entry.resource_id != resource_id {
            return Err(WaitingListError::InvalidState(format!(
                "entry {} belongs to resource {}, not {resource_id}",
                entry.id, entry.resource_id
            )));
        }
        if entry.status != EntryStatus::Offered {
            return Err(WaitingListError::InvalidState(format!(
                "no valid offer for entry {}: status is {:?}",
                entry.id, entry.status
            )));
        }
        Ok(())
    }

    fn arm_expiry(&self, entry: &QueueEntry, ttl: Duration) {
        let job = Self::expiry_job(
            Arc::downgrade(&self.inner),
            entry.id,
            entry.resource_id.clone(),
        );
        self.inner.timers.arm(entry.id, ttl, job);
    }

    /// Boxed (not `async fn`) so the timer future can name the expiration
    /// future that eventually arms it again.
    fn expiry_job(
        inner: Weak<Inner<St, R, L, S>>,
        entry_id: EntryId,
        resource_id: ResourceId,
    ) -> ExpiryJob {
        Box::pin(async move {
            let Some(inner) = inner.upgrade() else {
                tracing::debug!(entry_id, "waiting list dropped before offer deadline");
                return;
            };
            let list = Self { inner };
            if let Err(err) = list.expire_if_still_offered(entry_id, &resource_id).await {
                tracing::error!(
                    entry_id,
                    resource_id = %resource_id,
                    error = %err,
                    "offer expiration failed"
                );
            }
        })
    }

    async fn retrying<T, F, Fut>(
        &self,
        operation: &'static str,
        mut attempt: F,
    ) -> Result<T, WaitingListError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, WaitingListError>>,
    {
        let max_attempts = self.inner.config.max_conflict_retries.saturating_add(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            match attempt().await {
                Err(err) if err.is_retryable() => {
                    if attempts >= max_attempts {
                        tracing::error!(operation, attempts, error = %err, "conflict retries exhausted");
                        return Err(WaitingListError::RetriesExhausted {
                            operation: operation.to_owned(),
                            attempts,
                            last: err.to_string(),
                        });
                    }
                    tracing::warn!(operation, attempt = attempts, error = %err, "transient conflict, retrying");
                    tokio::task::yield_now().await;
                }
                other => return other,
            }
        }
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut St) -> Result<T, WaitingListError>,
    ) -> Result<T, WaitingListError> {
        let mut store = self.inner.store.lock();
        f(&mut store)
    }

    fn offer_ttl(&self, resource: &Resource) -> Duration {
        self.inner.config.offer_ttl_for(resource.kind.as_deref())
    }

    fn now_ms(&self) -> u128 {
        self.inner.clock.now_ms()
    }

    fn record(&self, entry: &QueueEntry, action: AuditAction, detail: Option<String>) {
        if let Some(sink) = self.inner.audit.lock().as_mut() {
            sink.record(build_audit_event(entry, action, detail));
        }
    }
}
