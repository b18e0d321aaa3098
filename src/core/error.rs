//! Error types for waiting-list operations.

use thiserror::Error;

/// Errors produced by waiting-list components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitingListError {
    /// The resource or queue entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The requester already holds a non-expired entry for the resource.
    #[error("requester {requester_id} already queued for resource {resource_id}")]
    AlreadyQueued {
        /// Resource the requester tried to join.
        resource_id: String,
        /// Requester holding the existing entry.
        requester_id: String,
    },
    /// The entry's current status does not allow the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Serialization or contention abort; safe to retry.
    #[error("transient conflict: {0}")]
    TransientConflict(String),
    /// Committing would oversell the resource.
    ///
    /// Unreachable while every writer honours the per-resource serialization;
    /// observing it means that discipline broke.
    #[error(
        "capacity exceeded for resource {resource_id}: total={total_units} committed={committed} live_offers={live_offers} requested={requested}"
    )]
    CapacityExceeded {
        /// Resource whose capacity would be exceeded.
        resource_id: String,
        /// Configured capacity.
        total_units: u32,
        /// Active or consumed allocations.
        committed: u32,
        /// Offers whose deadline has not passed.
        live_offers: u32,
        /// Offers the aborted operation tried to add.
        requested: usize,
    },
    /// Transient conflicts persisted past the retry budget.
    #[error("{operation} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Operation that was retried.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
        /// Message of the final conflict.
        last: String,
    },
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

impl WaitingListError {
    /// Whether the operation may be retried unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientConflict(_))
    }

    /// Whether the error is an expected, caller-visible outcome rather than a fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::AlreadyQueued { .. } | Self::InvalidState(_)
        )
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AlreadyQueued { .. } => "already_queued",
            Self::InvalidState(_) => "invalid_state",
            Self::TransientConflict(_) => "transient_conflict",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::Backend(_) => "backend",
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
