//! In-memory waiting-list store.

use std::collections::HashMap;

use crate::core::{EntryStatus, QueueEntry, WaitingListError, WaitingListStore};
use crate::util::serde::{EntryId, ResourceId};

/// In-memory store keeping every entry ever inserted.
///
/// Entries are indexed by id and, per resource, by insertion order; reads
/// that need FIFO order sort by `(created_at_ms, id)`.
#[derive(Debug, Default)]
pub struct InMemoryWaitingList {
    next_id: EntryId,
    entries: HashMap<EntryId, QueueEntry>,
    by_resource: HashMap<ResourceId, Vec<EntryId>>,
}

impl InMemoryWaitingList {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resource_entries<'a>(&'a self, resource_id: &str) -> impl Iterator<Item = &'a QueueEntry> + 'a {
        self.by_resource
            .get(resource_id)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.entries.get(id))
    }

    fn sorted(mut entries: Vec<QueueEntry>) -> Vec<QueueEntry> {
        entries.sort_by_key(QueueEntry::fifo_key);
        entries
    }
}

impl WaitingListStore for InMemoryWaitingList {
    fn allocate_id(&mut self) -> Result<EntryId, WaitingListError> {
        self.next_id += 1;
        Ok(self.next_id)
    }

    fn insert(&mut self, entry: QueueEntry) -> Result<(), WaitingListError> {
        if self.entries.contains_key(&entry.id) {
            return Err(WaitingListError::Backend(format!(
                "entry {} already exists",
                entry.id
            )));
        }
        if entry.status != EntryStatus::Expired
            && self
                .find_active(&entry.resource_id, &entry.requester_id)?
                .is_some()
        {
            return Err(WaitingListError::AlreadyQueued {
                resource_id: entry.resource_id,
                requester_id: entry.requester_id,
            });
        }
        self.by_resource
            .entry(entry.resource_id.clone())
            .or_default()
            .push(entry.id);
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    fn update(&mut self, entry: QueueEntry) -> Result<(), WaitingListError> {
        match self.entries.get_mut(&entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(WaitingListError::NotFound(format!("entry {}", entry.id))),
        }
    }

    fn get(&self, id: EntryId) -> Result<Option<QueueEntry>, WaitingListError> {
        Ok(self.entries.get(&id).cloned())
    }

    fn find_active(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<Option<QueueEntry>, WaitingListError> {
        Ok(self
            .resource_entries(resource_id)
            .find(|e| e.requester_id == requester_id && e.status != EntryStatus::Expired)
            .cloned())
    }

    fn live_offer_count(&self, resource_id: &str, now_ms: u128) -> Result<u32, WaitingListError> {
        let live = self
            .resource_entries(resource_id)
            .filter(|e| e.is_live_offer(now_ms))
            .count();
        u32::try_from(live).map_err(|_| WaitingListError::Backend("offer count overflow".into()))
    }

    fn oldest_waiting(
        &self,
        resource_id: &str,
        limit: usize,
    ) -> Result<Vec<QueueEntry>, WaitingListError> {
        let waiting = self
            .resource_entries(resource_id)
            .filter(|e| e.status == EntryStatus::Waiting)
            .cloned()
            .collect();
        let mut waiting = Self::sorted(waiting);
        waiting.truncate(limit);
        Ok(waiting)
    }

    fn stale_offers(
        &self,
        resource_id: &str,
        now_ms: u128,
    ) -> Result<Vec<QueueEntry>, WaitingListError> {
        let stale = self
            .resource_entries(resource_id)
            .filter(|e| e.status == EntryStatus::Offered && !e.is_live_offer(now_ms))
            .cloned()
            .collect();
        Ok(Self::sorted(stale))
    }

    fn entries_for(&self, resource_id: &str) -> Result<Vec<QueueEntry>, WaitingListError> {
        Ok(Self::sorted(self.resource_entries(resource_id).cloned().collect()))
    }

    fn resources(&self) -> Result<Vec<ResourceId>, WaitingListError> {
        let mut resources: Vec<_> = self.by_resource.keys().cloned().collect();
        resources.sort();
        Ok(resources)
    }
}
