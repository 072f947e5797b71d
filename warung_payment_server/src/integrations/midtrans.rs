//! Payload handling for the callback-verified provider (Midtrans).
//!
//! Midtrans notifications carry no signature we check here. Instead, the inbound payload is treated purely as a
//! hint: the handler re-queries the provider's status API over TLS and acts only on what the provider itself
//! reports. The [`TransactionVerifier`] trait is the seam for that re-query, so endpoint tests can substitute a
//! mock for the live client.
use midtrans_tools::{MidtransApi, MidtransApiError, TransactionRecord};
use serde_json::Value;
use warung_payment_engine::reconciliation::{FraudOutcome, ProviderStatus};
use wpg_common::Rupiah;

use crate::errors::ServerError;

/// The untrusted claim extracted from an inbound notification. Only the reference is ever used; the claimed
/// status is logged for comparison and then discarded in favour of the verified one.
#[derive(Debug, Clone)]
pub struct MidtransNotification {
    pub reference: String,
    pub claimed_status: String,
}

impl MidtransNotification {
    pub fn try_from_payload(raw: &Value) -> Result<Self, ServerError> {
        let reference = raw["order_id"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServerError::InvalidPayload("notification carries no order_id".to_string()))?;
        let claimed_status = raw["transaction_status"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ServerError::InvalidPayload("notification carries no transaction_status".to_string())
            })?;
        Ok(Self { reference: reference.to_string(), claimed_status: claimed_status.to_string() })
    }
}

/// The authenticity seam: anything that can answer "what does the provider say the status of this transaction
/// really is?". Production uses the live [`MidtransApi`] client; tests swap in a mock.
#[allow(async_fn_in_trait)]
pub trait TransactionVerifier {
    async fn transaction_status(&self, reference: &str) -> Result<TransactionRecord, MidtransApiError>;
}

impl TransactionVerifier for MidtransApi {
    async fn transaction_status(&self, reference: &str) -> Result<TransactionRecord, MidtransApiError> {
        MidtransApi::transaction_status(self, reference).await
    }
}

/// Translate a verified Midtrans status (and, for card captures, the accompanying fraud verdict) into the
/// normalized vocabulary.
pub fn normalize_status(transaction_status: &str, fraud_status: Option<&str>) -> ProviderStatus {
    match transaction_status {
        "capture" => {
            let outcome = match fraud_status {
                None | Some("accept") => FraudOutcome::Accept,
                Some("challenge") => FraudOutcome::Challenge,
                Some("deny") => FraudOutcome::Deny,
                Some(other) => {
                    return ProviderStatus::Unrecognized(format!("capture/{other}"));
                },
            };
            ProviderStatus::Capture(outcome)
        },
        "settlement" => ProviderStatus::Settlement,
        "pending" => ProviderStatus::AwaitingPayment,
        "deny" => ProviderStatus::Denied,
        "cancel" => ProviderStatus::Cancelled,
        "expire" => ProviderStatus::Expired,
        "refund" => ProviderStatus::Refund { partial: false },
        "partial_refund" => ProviderStatus::Refund { partial: true },
        other => ProviderStatus::Unrecognized(other.to_string()),
    }
}

/// Midtrans serializes amounts as decimal strings with two fractional digits, e.g. `"45000.00"`. Rupiah has no
/// subunits in practice, so the fraction is dropped.
pub fn parse_gross_amount(amount: &str) -> Option<Rupiah> {
    let whole = amount.split('.').next()?;
    whole.parse::<i64>().ok().map(Rupiah::from)
}
