//! In-memory resource catalog and allocation ledger.
//!
//! Both are cloneable handles over shared state, standing in for the event
//! CRUD service and the purchase workflow's ticket table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::core::{
    Allocation, AllocationLedger, AllocationStatus, Resource, ResourceProvider, WaitingListError,
};
use crate::util::clock::now_ms;
use crate::util::serde::ResourceId;

/// Resource catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    resources: Arc<RwLock<HashMap<ResourceId, Resource>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource.
    pub fn upsert(&self, resource: Resource) {
        self.resources.write().insert(resource.id.clone(), resource);
    }

    /// Remove a resource, returning it if present.
    pub fn remove(&self, resource_id: &str) -> Option<Resource> {
        self.resources.write().remove(resource_id)
    }
}

#[async_trait]
impl ResourceProvider for InMemoryCatalog {
    async fn get_resource(&self, resource_id: &str) -> Result<Option<Resource>, WaitingListError> {
        Ok(self.resources.read().get(resource_id).cloned())
    }
}

/// Allocation ledger held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    allocations: Arc<RwLock<HashMap<ResourceId, Vec<Allocation>>>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an allocation directly, as the purchase workflow would.
    pub fn record(
        &self,
        resource_id: &str,
        requester_id: &str,
        status: AllocationStatus,
    ) -> Allocation {
        let allocation = Allocation {
            id: Uuid::new_v4(),
            resource_id: resource_id.to_owned(),
            requester_id: requester_id.to_owned(),
            status,
            created_at_ms: now_ms(),
        };
        self.allocations
            .write()
            .entry(allocation.resource_id.clone())
            .or_default()
            .push(allocation.clone());
        allocation
    }

    /// Change an allocation's status, e.g. voiding it on refund.
    ///
    /// # Errors
    ///
    /// `NotFound` if no allocation has that id.
    pub fn set_status(
        &self,
        allocation_id: Uuid,
        status: AllocationStatus,
    ) -> Result<Allocation, WaitingListError> {
        let mut allocations = self.allocations.write();
        allocations
            .values_mut()
            .flatten()
            .find(|a| a.id == allocation_id)
            .map(|a| {
                a.status = status;
                a.clone()
            })
            .ok_or_else(|| WaitingListError::NotFound(format!("allocation {allocation_id}")))
    }

    /// Every allocation of a resource, in commit order.
    #[must_use]
    pub fn allocations(&self, resource_id: &str) -> Vec<Allocation> {
        self.allocations
            .read()
            .get(resource_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AllocationLedger for InMemoryLedger {
    async fn count_committed(&self, resource_id: &str) -> Result<u32, WaitingListError> {
        let committed = self
            .allocations
            .read()
            .get(resource_id)
            .map_or(0, |list| {
                list.iter()
                    .filter(|a| a.status.counts_against_capacity())
                    .count()
            });
        u32::try_from(committed)
            .map_err(|_| WaitingListError::Backend("allocation count overflow".into()))
    }

    async fn commit(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<Allocation, WaitingListError> {
        Ok(self.record(resource_id, requester_id, AllocationStatus::Active))
    }

    async fn void(&self, allocation_id: Uuid) -> Result<(), WaitingListError> {
        self.set_status(allocation_id, AllocationStatus::Void).map(|_| ())
    }
}
