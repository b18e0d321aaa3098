//! Availability accounting.
//!
//! Remaining capacity is always derived from current state: committed
//! allocations plus offers whose deadline has not passed. An offer past its
//! deadline stops counting immediately, whether or not expiration has run.

use serde::{Deserialize, Serialize};

use crate::core::{AllocationLedger, Resource, ResourceProvider, WaitingListError};

/// Capacity snapshot of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Configured capacity.
    pub total_units: u32,
    /// Active or consumed allocations.
    pub committed_count: u32,
    /// Offers whose deadline is still ahead.
    pub active_offer_count: u32,
    /// `total_units - committed_count - active_offer_count`; negative if oversold.
    pub remaining: i64,
}

impl Availability {
    /// Derive remaining capacity from raw counts.
    #[must_use]
    pub fn from_counts(total_units: u32, committed_count: u32, active_offer_count: u32) -> Self {
        Self {
            total_units,
            committed_count,
            active_offer_count,
            remaining: i64::from(total_units)
                - i64::from(committed_count)
                - i64::from(active_offer_count),
        }
    }

    /// Whether at least one unit can be offered.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.remaining > 0
    }

    /// Number of offers that fit right now.
    #[must_use]
    pub fn free_units(&self) -> usize {
        usize::try_from(self.remaining.max(0)).unwrap_or(usize::MAX)
    }
}

/// Load the resource and derive its availability.
///
/// `live_offers` is evaluated last so the offer count is as fresh as possible
/// relative to the ledger read.
pub(crate) async fn compute<R, L, F>(
    resources: &R,
    ledger: &L,
    resource_id: &str,
    live_offers: F,
) -> Result<(Resource, Availability), WaitingListError>
where
    R: ResourceProvider,
    L: AllocationLedger,
    F: FnOnce() -> Result<u32, WaitingListError>,
{
    let resource = resources
        .get_resource(resource_id)
        .await?
        .ok_or_else(|| WaitingListError::NotFound(format!("resource {resource_id}")))?;
    let committed = ledger.count_committed(resource_id).await?;
    let live = live_offers()?;
    let availability = Availability::from_counts(resource.total_units, committed, live);
    Ok((resource, availability))
}
