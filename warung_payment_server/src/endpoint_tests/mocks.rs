use chrono::Utc;
use midtrans_tools::{MidtransApiError, TransactionRecord};
use mockall::mock;
use serde_json::json;
use warung_payment_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatus, ProviderReference},
    traits::{ReconciliationDatabase, ReconciliationError},
};
use wpg_common::Rupiah;

use crate::integrations::midtrans::TransactionVerifier;

mock! {
    pub ReconciliationDb {}
    impl ReconciliationDatabase for ReconciliationDb {
        fn url(&self) -> &str;
        async fn fetch_order_by_reference(&self, reference: &ProviderReference) -> Result<Option<Order>, ReconciliationError>;
        async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), ReconciliationError>;
        async fn checked_status_update(&self, reference: &ProviderReference, expected: OrderStatus, target: OrderStatus, metadata: &str) -> Result<Option<Order>, ReconciliationError>;
        async fn close(&mut self) -> Result<(), ReconciliationError>;
    }
}

mock! {
    pub Verifier {}
    impl TransactionVerifier for Verifier {
        async fn transaction_status(&self, reference: &str) -> Result<TransactionRecord, MidtransApiError>;
    }
}

pub fn stored_order(reference: &str, status: OrderStatus) -> Order {
    let now = Utc::now();
    Order {
        id: 1,
        order_id: OrderId::from(reference.to_string()),
        provider_reference: ProviderReference::from(reference),
        status,
        gross_amount: Rupiah::from(45_000),
        currency: "IDR".to_string(),
        payment_metadata: None,
        customer_email: None,
        created_at: now,
        updated_at: now,
        last_webhook_at: None,
    }
}

pub fn verified_record(reference: &str, transaction_status: &str, fraud_status: Option<&str>) -> TransactionRecord {
    TransactionRecord {
        order_id: reference.to_string(),
        transaction_id: Some("9aed5972-5b6a-401e-894b-a32c91ed1a3a".to_string()),
        transaction_status: transaction_status.to_string(),
        fraud_status: fraud_status.map(String::from),
        payment_type: Some("credit_card".to_string()),
        gross_amount: Some("45000.00".to_string()),
        raw: json!({
            "order_id": reference,
            "transaction_status": transaction_status,
            "fraud_status": fraud_status,
            "gross_amount": "45000.00",
        }),
    }
}
