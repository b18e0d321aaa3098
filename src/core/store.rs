//! Storage abstraction for queue entries.

use crate::core::{QueueEntry, WaitingListError};
use crate::util::serde::{EntryId, ResourceId};

/// Abstraction for waiting-list storage backends.
///
/// Methods are synchronous and short; the waiting list wraps the store in a
/// mutex and serializes writers per resource on top of it. Backends with
/// optimistic concurrency report aborted writes as
/// [`WaitingListError::TransientConflict`], which the caller retries.
pub trait WaitingListStore {
    /// Reserve the next entry id. Ids strictly increase.
    fn allocate_id(&mut self) -> Result<EntryId, WaitingListError>;

    /// Persist a new entry.
    ///
    /// Rejects a second non-expired entry for the same resource and requester
    /// with [`WaitingListError::AlreadyQueued`].
    fn insert(&mut self, entry: QueueEntry) -> Result<(), WaitingListError>;

    /// Replace an existing entry, failing with `NotFound` if it was never inserted.
    fn update(&mut self, entry: QueueEntry) -> Result<(), WaitingListError>;

    /// Fetch an entry by id.
    fn get(&self, id: EntryId) -> Result<Option<QueueEntry>, WaitingListError>;

    /// The requester's non-expired entry for a resource, if any.
    fn find_active(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<Option<QueueEntry>, WaitingListError>;

    /// Count offers for a resource whose deadline is after `now_ms`.
    fn live_offer_count(&self, resource_id: &str, now_ms: u128) -> Result<u32, WaitingListError>;

    /// Up to `limit` waiting entries for a resource, oldest first.
    fn oldest_waiting(
        &self,
        resource_id: &str,
        limit: usize,
    ) -> Result<Vec<QueueEntry>, WaitingListError>;

    /// Offers for a resource whose deadline is at or before `now_ms`.
    fn stale_offers(
        &self,
        resource_id: &str,
        now_ms: u128,
    ) -> Result<Vec<QueueEntry>, WaitingListError>;

    /// Every entry for a resource in first-come-first-served order.
    fn entries_for(&self, resource_id: &str) -> Result<Vec<QueueEntry>, WaitingListError>;

    /// Resources that have at least one entry.
    fn resources(&self) -> Result<Vec<ResourceId>, WaitingListError>;
}
