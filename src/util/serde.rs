//! Identifier types shared across the waiting list.

/// Identifier of a queue entry.
///
/// Assigned by the store in strictly increasing order, so comparing two ids
/// compares insertion order.
pub type EntryId = u64;

/// Identifier of an allocatable resource (for example an event's ticket pool).
pub type ResourceId = String;

/// Identifier of a requester (for example a user id issued by the auth layer).
pub type RequesterId = String;
