//! Queue entries and their status lifecycle.

use serde::{Deserialize, Serialize};

use crate::core::WaitingListError;
use crate::util::serde::{EntryId, RequesterId, ResourceId};

/// Status of a queue entry.
///
/// `Waiting → Offered → {Expired, Fulfilled}`; an entry is created either
/// `Waiting` or `Offered` and never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Queued behind other requesters, holding nothing.
    Waiting,
    /// Holding a time-bounded exclusive offer of one unit.
    Offered,
    /// Offer lapsed or was released. Terminal.
    Expired,
    /// Offer converted into an allocation by the purchase workflow. Terminal.
    Fulfilled,
}

impl EntryStatus {
    /// Whether the entry still occupies a place in line (waiting or offered).
    #[must_use]
    pub const fn is_queued(self) -> bool {
        matches!(self, Self::Waiting | Self::Offered)
    }
}

/// One requester's place in the waiting list of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Store-assigned identifier; increases with insertion order.
    pub id: EntryId,
    /// Resource being waited on.
    pub resource_id: ResourceId,
    /// Requester holding this entry.
    pub requester_id: RequesterId,
    /// Current lifecycle status.
    pub status: EntryStatus,
    /// Creation time in milliseconds; fixes FIFO order.
    pub created_at_ms: u128,
    /// Offer deadline in milliseconds; set only while `Offered`.
    pub offer_expires_at_ms: Option<u128>,
}

impl QueueEntry {
    /// New entry waiting for capacity.
    pub fn waiting(
        id: EntryId,
        resource_id: impl Into<ResourceId>,
        requester_id: impl Into<RequesterId>,
        created_at_ms: u128,
    ) -> Self {
        Self {
            id,
            resource_id: resource_id.into(),
            requester_id: requester_id.into(),
            status: EntryStatus::Waiting,
            created_at_ms,
            offer_expires_at_ms: None,
        }
    }

    /// New entry granted an offer at creation.
    pub fn offered(
        id: EntryId,
        resource_id: impl Into<ResourceId>,
        requester_id: impl Into<RequesterId>,
        created_at_ms: u128,
        offer_expires_at_ms: u128,
    ) -> Self {
        Self {
            status: EntryStatus::Offered,
            offer_expires_at_ms: Some(offer_expires_at_ms),
            ..Self::waiting(id, resource_id, requester_id, created_at_ms)
        }
    }

    /// Key that orders entries first-come-first-served.
    #[must_use]
    pub const fn fifo_key(&self) -> (u128, EntryId) {
        (self.created_at_ms, self.id)
    }

    /// Whether this entry holds an offer whose deadline is still ahead of `now_ms`.
    #[must_use]
    pub fn is_live_offer(&self, now_ms: u128) -> bool {
        self.status == EntryStatus::Offered
            && self.offer_expires_at_ms.is_some_and(|deadline| deadline > now_ms)
    }

    /// Promote a waiting entry into an offer.
    ///
    /// # Errors
    ///
    /// [`WaitingListError::InvalidState`] unless the entry is waiting.
    pub fn offer(&mut self, expires_at_ms: u128) -> Result<(), WaitingListError> {
        self.transition(EntryStatus::Waiting, EntryStatus::Offered)?;
        self.offer_expires_at_ms = Some(expires_at_ms);
        Ok(())
    }

    /// Expire an outstanding offer.
    ///
    /// # Errors
    ///
    /// [`WaitingListError::InvalidState`] unless the entry is offered.
    pub fn expire(&mut self) -> Result<(), WaitingListError> {
        self.transition(EntryStatus::Offered, EntryStatus::Expired)?;
        self.offer_expires_at_ms = None;
        Ok(())
    }

    /// Mark an outstanding offer as purchased.
    ///
    /// # Errors
    ///
    /// [`WaitingListError::InvalidState`] unless the entry is offered.
    pub fn fulfill(&mut self) -> Result<(), WaitingListError> {
        self.transition(EntryStatus::Offered, EntryStatus::Fulfilled)?;
        self.offer_expires_at_ms = None;
        Ok(())
    }

    fn transition(&mut self, from: EntryStatus, to: EntryStatus) -> Result<(), WaitingListError> {
        if self.status != from {
            return Err(WaitingListError::InvalidState(format!(
                "entry {} is {:?}, expected {:?} to move to {:?}",
                self.id, self.status, from, to
            )));
        }
        self.status = to;
        Ok(())
    }
}

/// Result of a join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    /// Whether an offer was granted immediately.
    pub granted: bool,
    /// The entry created for the requester.
    pub entry: QueueEntry,
}

/// A requester's place in line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePosition {
    /// The requester's non-expired entry.
    pub entry: QueueEntry,
    /// One plus the waiting or offered entries ahead of this one.
    ///
    /// "Ahead" follows promotion order `(created_at_ms, id)`, so an entry
    /// created in the same millisecond with a smaller id also counts.
    pub rank: usize,
    /// One plus the waiting entries ahead of this one.
    pub waiting_rank: usize,
}
