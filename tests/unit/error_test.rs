//! Tests for error types

use prometheus_waiting_list::core::WaitingListError;

#[test]
fn test_not_found_error() {
    let err = WaitingListError::NotFound("resource event-1".to_string());
    assert_eq!(format!("{}", err), "not found: resource event-1");
    assert_eq!(err.kind(), "not_found");
    assert!(err.is_client_error());
}

#[test]
fn test_already_queued_error() {
    let err = WaitingListError::AlreadyQueued {
        resource_id: "event-1".to_string(),
        requester_id: "alice".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "requester alice already queued for resource event-1"
    );
    assert!(!err.is_retryable());
}

#[test]
fn test_capacity_exceeded_error() {
    let err = WaitingListError::CapacityExceeded {
        resource_id: "event-1".to_string(),
        total_units: 2,
        committed: 2,
        live_offers: 1,
        requested: 1,
    };
    assert_eq!(
        format!("{}", err),
        "capacity exceeded for resource event-1: total=2 committed=2 live_offers=1 requested=1"
    );
    assert!(!err.is_client_error());
}

#[test]
fn test_transient_conflict_is_retryable() {
    let err = WaitingListError::TransientConflict("deadlock detected".to_string());
    assert!(err.is_retryable());
    assert_eq!(err.kind(), "transient_conflict");
}

#[test]
fn test_retries_exhausted_error() {
    let err = WaitingListError::RetriesExhausted {
        operation: "join".to_string(),
        attempts: 4,
        last: "transient conflict: deadlock detected".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "join failed after 4 attempts: transient conflict: deadlock detected"
    );
    assert!(!err.is_retryable());
}

#[test]
fn test_backend_error() {
    let err = WaitingListError::Backend("connection failed".to_string());
    assert_eq!(format!("{}", err), "backend error: connection failed");
}

#[test]
fn test_app_result_wraps_waiting_list_error() {
    fn load() -> prometheus_waiting_list::core::AppResult<()> {
        Err(WaitingListError::InvalidState("entry 1 is expired".to_string()))?;
        Ok(())
    }
    let err = load().unwrap_err();
    assert_eq!(
        err.downcast_ref::<WaitingListError>(),
        Some(&WaitingListError::InvalidState("entry 1 is expired".to_string()))
    );
}
