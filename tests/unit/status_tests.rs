//! Status serialization used by operator tooling

use seedforge::{RequestId, RequestStatus};

#[test]
fn status_serializes_with_snake_case_tag() {
    let status = RequestStatus::Pending {
        request_id: RequestId(7),
        quantity: 5,
        opened_at_block: 1_000,
    };
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":\"pending\""));

    let back: RequestStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(back, status);
}

#[test]
fn empty_status_is_minimal() {
    let json = serde_json::to_string(&RequestStatus::Empty).unwrap();
    assert_eq!(json, "{\"status\":\"empty\"}");
}

#[test]
fn status_predicates_are_exclusive() {
    let ready = RequestStatus::Ready {
        request_id: RequestId(7),
        quantity: 5,
    };
    assert!(ready.is_ready());
    assert!(!ready.is_pending());
    assert!(!ready.is_empty());
}
