//! Payload handling for the signed-webhook provider (DOKU).
//!
//! Authenticity is established before this code runs: the signature middleware has already verified the HMAC over
//! the raw body, so the status claimed in the payload can be trusted. This module only extracts the small typed
//! subset the reconciler needs and normalizes the provider's status vocabulary.
use serde_json::Value;
use warung_payment_engine::{
    db_types::ProviderReference,
    reconciliation::ProviderStatus,
};
use wpg_common::Rupiah;

use crate::errors::ServerError;

/// The typed subset of a notification the reconciler acts on. Everything else stays in `raw` and is stored
/// opaquely as payment metadata.
#[derive(Debug, Clone)]
pub struct DokuNotification {
    pub reference: ProviderReference,
    pub status: ProviderStatus,
    pub settled_amount: Option<Rupiah>,
    pub raw: Value,
}

impl DokuNotification {
    /// Tolerant parse: only the transaction reference and status are required; unknown and extra fields are
    /// passed through untouched. The provider has moved fields between `order.invoice_number` and a top-level
    /// `order_id` across API versions, so both spellings are accepted.
    pub fn try_from_payload(raw: Value) -> Result<Self, ServerError> {
        if !raw.is_object() {
            return Err(ServerError::InvalidPayload("notification body must be a JSON object".to_string()));
        }
        let reference = raw["order"]["invoice_number"]
            .as_str()
            .or_else(|| raw["order_id"].as_str())
            .map(ProviderReference::from)
            .ok_or_else(|| {
                ServerError::InvalidPayload("notification carries no transaction reference".to_string())
            })?;
        let status = raw["transaction"]["status"]
            .as_str()
            .ok_or_else(|| ServerError::InvalidPayload("notification carries no transaction status".to_string()))?;
        let status = normalize_status(status);
        let settled_amount = raw["order"]["amount"].as_i64().map(Rupiah::from);
        Ok(Self { reference, status, settled_amount, raw })
    }
}

/// Translate the provider's status vocabulary into the normalized one. Unrecognized codes are carried verbatim
/// so the reconciler can record them for triage.
pub fn normalize_status(code: &str) -> ProviderStatus {
    match code.to_ascii_uppercase().as_str() {
        "SUCCESS" => ProviderStatus::Settlement,
        "PENDING" => ProviderStatus::AwaitingPayment,
        "FAILED" => ProviderStatus::Denied,
        "EXPIRED" => ProviderStatus::Expired,
        "CANCELLED" | "CANCELED" => ProviderStatus::Cancelled,
        "REFUND" | "REFUNDED" => ProviderStatus::Refund { partial: false },
        _ => ProviderStatus::Unrecognized(code.to_string()),
    }
}
