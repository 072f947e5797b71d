use serde_json::Value;

use crate::MidtransApiError;

/// The subset of a Midtrans transaction-status response the gateway acts on, plus the raw response for
/// pass-through storage.
///
/// Midtrans adds fields to this payload over time, so only the handful we need are extracted explicitly; the
/// remainder travels along opaquely in `raw`.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// The merchant order id echoed back by Midtrans.
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub payment_type: Option<String>,
    /// Midtrans serializes amounts as decimal strings, e.g. `"45000.00"`.
    pub gross_amount: Option<String>,
    /// The full, unmodified status response.
    pub raw: Value,
}

impl TransactionRecord {
    pub fn from_response(raw: Value) -> Result<Self, MidtransApiError> {
        let order_id = raw["order_id"]
            .as_str()
            .ok_or_else(|| MidtransApiError::ResponseError("status response is missing order_id".to_string()))?
            .to_string();
        let transaction_status = raw["transaction_status"]
            .as_str()
            .ok_or_else(|| {
                MidtransApiError::ResponseError("status response is missing transaction_status".to_string())
            })?
            .to_string();
        let field = |name: &str| raw[name].as_str().map(String::from);
        Ok(Self {
            order_id,
            transaction_id: field("transaction_id"),
            transaction_status,
            fraud_status: field("fraud_status"),
            payment_type: field("payment_type"),
            gross_amount: field("gross_amount"),
            raw,
        })
    }
}
