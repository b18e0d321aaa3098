//! Boundary with the collaborators that own resources and allocations.
//!
//! Resource metadata and committed allocations live outside the waiting list;
//! it only reads capacity and commitment counts, plus the write paths used when
//! a purchase converts an offer into an allocation or has to undo one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::WaitingListError;
use crate::util::serde::{RequesterId, ResourceId};

/// A countable resource, such as the ticket pool of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Total units that may ever be committed or offered at once.
    pub total_units: u32,
    /// Optional resource type used to pick a per-type offer duration.
    #[serde(default)]
    pub kind: Option<String>,
}

impl Resource {
    /// Resource without a type.
    pub fn new(id: impl Into<ResourceId>, total_units: u32) -> Self {
        Self {
            id: id.into(),
            total_units,
            kind: None,
        }
    }

    /// Attach a resource type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Status of a committed allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// Sold and not yet used.
    Active,
    /// Sold and used.
    Consumed,
    /// Refunded or cancelled; frees its unit.
    Void,
}

impl AllocationStatus {
    /// Whether the allocation occupies a unit of capacity.
    #[must_use]
    pub const fn counts_against_capacity(self) -> bool {
        matches!(self, Self::Active | Self::Consumed)
    }
}

/// One unit committed to a requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation identifier.
    pub id: Uuid,
    /// Resource the unit belongs to.
    pub resource_id: ResourceId,
    /// Requester holding the unit.
    pub requester_id: RequesterId,
    /// Current status.
    pub status: AllocationStatus,
    /// Commit time in milliseconds.
    pub created_at_ms: u128,
}

/// Source of resource capacity.
#[async_trait]
pub trait ResourceProvider: Send + Sync + 'static {
    /// Look up a resource; `Ok(None)` when it does not exist.
    async fn get_resource(&self, resource_id: &str) -> Result<Option<Resource>, WaitingListError>;
}

/// Ledger of committed allocations.
#[async_trait]
pub trait AllocationLedger: Send + Sync + 'static {
    /// Number of active or consumed allocations for a resource.
    async fn count_committed(&self, resource_id: &str) -> Result<u32, WaitingListError>;

    /// Commit one active allocation for a requester.
    async fn commit(
        &self,
        resource_id: &str,
        requester_id: &str,
    ) -> Result<Allocation, WaitingListError>;

    /// Void an allocation so its unit no longer counts against capacity.
    async fn void(&self, allocation_id: Uuid) -> Result<(), WaitingListError>;
}
