//! API-facing request/response models.

use serde::{Deserialize, Serialize};

use crate::core::{
    AllocationLedger, EntryStatus, JoinOutcome, QueueEntry, ResourceProvider, Spawn, WaitingList,
    WaitingListError, WaitingListStore,
};
use crate::util::serde::{EntryId, RequesterId, ResourceId};

/// Join request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Resource to wait for.
    pub resource_id: ResourceId,
    /// Requester joining.
    pub requester_id: RequesterId,
}

/// Join response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResponse {
    /// Whether the join was accepted.
    pub success: bool,
    /// Status of the created entry.
    pub status: EntryStatus,
    /// Created entry.
    pub entry_id: EntryId,
    /// Offer deadline when an offer was granted.
    pub offer_expires_at_ms: Option<u128>,
    /// Human-readable summary.
    pub message: String,
}

impl From<JoinOutcome> for JoinResponse {
    fn from(outcome: JoinOutcome) -> Self {
        let entry = outcome.entry;
        let message = if outcome.granted {
            let minutes = entry
                .offer_expires_at_ms
                .map_or(0, |deadline| deadline.saturating_sub(entry.created_at_ms) / 60_000);
            format!("Ticket offered - you have {minutes} minutes to purchase")
        } else {
            "Added to waiting list - you'll be notified when a ticket becomes available.".to_owned()
        };
        Self {
            success: true,
            status: entry.status,
            entry_id: entry.id,
            offer_expires_at_ms: entry.offer_expires_at_ms,
            message,
        }
    }
}

/// Release request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// Resource the offer belongs to.
    pub resource_id: ResourceId,
    /// Offered entry to give back.
    pub entry_id: EntryId,
}

/// Queue position response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResponse {
    /// The requester's non-expired entry.
    pub entry: QueueEntry,
    /// Waiting or offered entries ahead, plus one.
    pub position: usize,
    /// Waiting entries ahead, plus one.
    pub waiting_position: usize,
}

/// Availability response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether a join would be offered a unit right now.
    pub available: bool,
    /// Units free to offer; zero when oversold.
    pub available_spots: usize,
    /// Configured capacity.
    pub total_units: u32,
    /// Committed allocations.
    pub purchased_count: u32,
    /// Offers still within their deadline.
    pub active_offers: u32,
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error kind.
    pub kind: String,
    /// Display message.
    pub message: String,
    /// Whether retrying the same call may succeed.
    pub retryable: bool,
}

impl From<WaitingListError> for ErrorResponse {
    fn from(err: WaitingListError) -> Self {
        Self {
            kind: err.kind().to_owned(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Offer timers currently armed.
    pub pending_timers: usize,
}

/// Join the waiting list described by `req`.
///
/// # Errors
///
/// See [`WaitingList::join`].
pub async fn join_waiting_list<St, R, L, S>(
    list: &WaitingList<St, R, L, S>,
    req: &JoinRequest,
) -> Result<JoinResponse, ErrorResponse>
where
    St: WaitingListStore + Send + 'static,
    R: ResourceProvider,
    L: AllocationLedger,
    S: Spawn + Send + Sync + 'static,
{
    list.join(&req.resource_id, &req.requester_id)
        .await
        .map(JoinResponse::from)
        .map_err(ErrorResponse::from)
}

/// Give back the offer described by `req`.
///
/// # Errors
///
/// See [`WaitingList::release`].
pub async fn release_offer<St, R, L, S>(
    list: &WaitingList<St, R, L, S>,
    req: &ReleaseRequest,
) -> Result<(), ErrorResponse>
where
    St: WaitingListStore + Send + 'static,
    R: ResourceProvider,
    L: AllocationLedger,
    S: Spawn + Send + Sync + 'static,
{
    list.release(&req.resource_id, req.entry_id)
        .await
        .map_err(ErrorResponse::from)
}

/// Position of a requester, `None` when they hold no non-expired entry.
///
/// # Errors
///
/// Store failures.
pub fn queue_position<St, R, L, S>(
    list: &WaitingList<St, R, L, S>,
    resource_id: &str,
    requester_id: &str,
) -> Result<Option<PositionResponse>, ErrorResponse>
where
    St: WaitingListStore + Send + 'static,
    R: ResourceProvider,
    L: AllocationLedger,
    S: Spawn + Send + Sync + 'static,
{
    let position = list
        .position(resource_id, requester_id)
        .map_err(ErrorResponse::from)?;
    Ok(position.map(|p| PositionResponse {
        entry: p.entry,
        position: p.rank,
        waiting_position: p.waiting_rank,
    }))
}

/// Availability summary of a resource.
///
/// # Errors
///
/// See [`WaitingList::compute_availability`].
pub async fn resource_availability<St, R, L, S>(
    list: &WaitingList<St, R, L, S>,
    resource_id: &str,
) -> Result<AvailabilityResponse, ErrorResponse>
where
    St: WaitingListStore + Send + 'static,
    R: ResourceProvider,
    L: AllocationLedger,
    S: Spawn + Send + Sync + 'static,
{
    let availability = list
        .compute_availability(resource_id)
        .await
        .map_err(ErrorResponse::from)?;
    Ok(AvailabilityResponse {
        available: availability.is_available(),
        available_spots: availability.free_units(),
        total_units: availability.total_units,
        purchased_count: availability.committed_count,
        active_offers: availability.active_offer_count,
    })
}

/// Return a health payload.
pub fn health<St, R, L, S>(list: &WaitingList<St, R, L, S>) -> Health
where
    S: Spawn,
{
    Health {
        ok: true,
        pending_timers: list.pending_timers(),
    }
}
