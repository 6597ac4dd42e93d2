//! Razorpay webhook integration tests.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{captured_event, TestHarness};
use paydesk_core::PaymentLookup;
use paydesk_store::Store;

fn stored(harness: &TestHarness, payment_id: &str) -> Vec<paydesk_core::PaymentRecord> {
    harness
        .store
        .find_payments(&PaymentLookup::new(None, Some(payment_id), None, None))
        .unwrap()
}

#[tokio::test]
async fn captured_payment_is_stored() {
    let harness = TestHarness::new();
    let body = captured_event("pay_Cap1", "asha@example.com", 50_099, 1_700_000_000);

    let response = harness.post_signed(&body).await;

    response.assert_status(StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["message"], "Payment details stored successfully");

    let records = stored(&harness, "pay_Cap1");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.price, Some(500));
    assert_eq!(record.email, "asha@example.com");
    assert_eq!(record.transaction_id, "N/A");
    assert_eq!(record.rrn.as_deref(), Some("412345678901"));
    assert_eq!(record.date, "2023-11-14 22:13:20");
    assert_eq!(record.subject.as_deref(), Some("Maths"));
}

#[tokio::test]
async fn other_events_are_ignored() {
    let harness = TestHarness::new();
    let body = serde_json::to_vec(&json!({
        "event": "payment.failed",
        "payload": {"payment": {"entity": {"id": "pay_Fail1", "amount": 100}}}
    }))
    .unwrap();

    let response = harness.post_signed(&body).await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["message"], "Event ignored");
    assert!(stored(&harness, "pay_Fail1").is_empty());
}

#[tokio::test]
async fn missing_signature_is_forbidden() {
    let harness = TestHarness::new();
    let body = captured_event("pay_NoSig", "asha@example.com", 10_000, 1_700_000_000);

    let response = harness.post_razorpay(&body, None).await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json: Value = response.json();
    assert_eq!(json["error"], "Signature missing");
    assert!(stored(&harness, "pay_NoSig").is_empty());
}

#[tokio::test]
async fn invalid_signature_is_forbidden() {
    let harness = TestHarness::new();
    let body = captured_event("pay_BadSig", "asha@example.com", 10_000, 1_700_000_000);
    let mut tampered = body.clone();
    let last = tampered.len() - 2;
    tampered[last] ^= 0x01;

    let response = harness
        .post_razorpay(&tampered, Some(&TestHarness::sign(&body)))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid signature");
    assert!(stored(&harness, "pay_BadSig").is_empty());
}

#[tokio::test]
async fn signature_is_checked_before_parsing() {
    let harness = TestHarness::new();

    let response = harness.post_razorpay(b"not json", Some("deadbeef")).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signed_garbage_is_a_bad_request() {
    let harness = TestHarness::new();

    let response = harness.post_signed(b"not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid payload");
}

#[tokio::test]
async fn amounts_are_floored_to_rupees() {
    let harness = TestHarness::new();

    for (payment_id, amount, expected) in [("pay_A", 99, 0), ("pay_B", 100, 1), ("pay_C", 12_345, 123)] {
        let body = captured_event(payment_id, "asha@example.com", amount, 1_700_000_000);
        harness.post_signed(&body).await.assert_status(StatusCode::CREATED);

        let records = stored(&harness, payment_id);
        assert_eq!(records[0].price, Some(expected), "{payment_id}");
    }
}
