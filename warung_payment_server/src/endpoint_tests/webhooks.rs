use actix_web::http::StatusCode;
use midtrans_tools::MidtransApiError;
use serde_json::json;
use warung_payment_engine::db_types::OrderStatus;

use crate::endpoint_tests::{
    helpers::{post_doku, post_midtrans},
    mocks::{stored_order, verified_record, MockReconciliationDb, MockVerifier},
};

fn signed_settlement(reference: &str) -> serde_json::Value {
    json!({
        "order": {"invoice_number": reference, "amount": 45_000},
        "transaction": {"status": "SUCCESS"}
    })
}

#[actix_web::test]
async fn signed_settlement_updates_the_order() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .withf(|r| r.as_str() == "WRG-1001")
        .returning(|_| Ok(Some(stored_order("WRG-1001", OrderStatus::Pending))));
    db.expect_checked_status_update()
        .withf(|r, expected, target, _| {
            r.as_str() == "WRG-1001" && *expected == OrderStatus::Pending && *target == OrderStatus::Paid
        })
        .returning(|_, _, _, _| Ok(Some(stored_order("WRG-1001", OrderStatus::Paid))));
    let (status, body) = post_doku(db, &signed_settlement("WRG-1001")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order status updated."), "unexpected body: {body}");
    assert!(body.contains("\"status\":\"Paid\""), "unexpected body: {body}");
}

#[actix_web::test]
async fn replayed_notification_is_acknowledged_without_a_write() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .returning(|_| Ok(Some(stored_order("WRG-1001", OrderStatus::Paid))));
    // No expectation on checked_status_update: the mock panics if the handler tries to write.
    let (status, body) = post_doku(db, &signed_settlement("WRG-1001")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("already processed"), "unexpected body: {body}");
}

#[actix_web::test]
async fn stale_pending_after_settlement_is_ignored() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .returning(|_| Ok(Some(stored_order("WRG-1001", OrderStatus::Paid))));
    let payload = json!({
        "order": {"invoice_number": "WRG-1001"},
        "transaction": {"status": "PENDING"}
    });
    let (status, body) = post_doku(db, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Out-of-order"), "unexpected body: {body}");
    assert!(body.contains("\"status\":\"Paid\""), "unexpected body: {body}");
}

#[actix_web::test]
async fn unknown_references_are_acknowledged_so_the_provider_stops_retrying() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference().returning(|_| Ok(None));
    let (status, body) = post_doku(db, &signed_settlement("NO-SUCH-ORDER")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No matching order"), "unexpected body: {body}");
}

#[actix_web::test]
async fn malformed_payloads_are_bad_requests() {
    let db = MockReconciliationDb::new();
    let payload = json!({"order": {"invoice_number": "WRG-1001"}});
    let (status, _) = post_doku(db, &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn write_conflicts_are_still_acknowledged() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .returning(|_| Ok(Some(stored_order("WRG-1001", OrderStatus::Pending))));
    db.expect_checked_status_update().returning(|_, _, _, _| Ok(None));
    let (status, body) = post_doku(db, &signed_settlement("WRG-1001")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("concurrent update"), "unexpected body: {body}");
}

#[actix_web::test]
async fn callback_verification_overrides_the_claimed_status() {
    // The notification claims settlement, but the provider says the transaction is still pending. The stored
    // order must not move.
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .returning(|_| Ok(Some(stored_order("WRG-2002", OrderStatus::Pending))));
    let mut verifier = MockVerifier::new();
    verifier
        .expect_transaction_status()
        .withf(|r| r == "WRG-2002")
        .returning(|r| Ok(verified_record(r, "pending", None)));
    let payload = json!({"order_id": "WRG-2002", "transaction_status": "settlement"});
    let (status, body) = post_midtrans(db, verifier, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("already processed"), "unexpected body: {body}");
}

#[actix_web::test]
async fn verified_settlement_marks_the_order_paid() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .returning(|_| Ok(Some(stored_order("WRG-2002", OrderStatus::Pending))));
    db.expect_checked_status_update()
        .withf(|_, expected, target, _| *expected == OrderStatus::Pending && *target == OrderStatus::Paid)
        .returning(|_, _, _, _| Ok(Some(stored_order("WRG-2002", OrderStatus::Paid))));
    let mut verifier = MockVerifier::new();
    verifier.expect_transaction_status().returning(|r| Ok(verified_record(r, "settlement", None)));
    let payload = json!({"order_id": "WRG-2002", "transaction_status": "settlement"});
    let (status, body) = post_midtrans(db, verifier, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"Paid\""), "unexpected body: {body}");
}

#[actix_web::test]
async fn challenged_captures_land_in_fraud_review() {
    let mut db = MockReconciliationDb::new();
    db.expect_fetch_order_by_reference()
        .returning(|_| Ok(Some(stored_order("WRG-2002", OrderStatus::Pending))));
    db.expect_checked_status_update()
        .withf(|_, _, target, _| *target == OrderStatus::FraudReview)
        .returning(|_, _, _, _| Ok(Some(stored_order("WRG-2002", OrderStatus::FraudReview))));
    let mut verifier = MockVerifier::new();
    verifier.expect_transaction_status().returning(|r| Ok(verified_record(r, "capture", Some("challenge"))));
    let payload = json!({"order_id": "WRG-2002", "transaction_status": "capture", "fraud_status": "challenge"});
    let (status, body) = post_midtrans(db, verifier, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"FraudReview\""), "unexpected body: {body}");
}

#[actix_web::test]
async fn forged_notifications_are_rejected_with_401() {
    // The provider has no record of the transaction, so the notification cannot be genuine. The database must
    // not even be consulted.
    let db = MockReconciliationDb::new();
    let mut verifier = MockVerifier::new();
    verifier
        .expect_transaction_status()
        .returning(|r| Err(MidtransApiError::TransactionNotFound(r.to_string())));
    let payload = json!({"order_id": "FORGED-1", "transaction_status": "settlement"});
    let (status, _) = post_midtrans(db, verifier, &payload).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn verification_outage_asks_the_provider_to_retry() {
    let db = MockReconciliationDb::new();
    let mut verifier = MockVerifier::new();
    verifier
        .expect_transaction_status()
        .returning(|_| Err(MidtransApiError::Unavailable("connection refused".to_string())));
    let payload = json!({"order_id": "WRG-2002", "transaction_status": "settlement"});
    let (status, _) = post_midtrans(db, verifier, &payload).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn midtrans_notifications_without_an_order_id_are_bad_requests() {
    let db = MockReconciliationDb::new();
    let verifier = MockVerifier::new();
    let payload = json!({"transaction_status": "settlement"});
    let (status, _) = post_midtrans(db, verifier, &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
