//! The inbound notification endpoints.
//!
//! Two routes, one per authenticity strategy:
//! * `doku_webhook` sits behind [`crate::middleware::SignatureMiddlewareFactory`], which has already verified the
//!   HMAC signature over the raw body by the time the handler runs.
//! * `midtrans_webhook` authenticates by callback: the payload only nominates a transaction reference, and the
//!   handler re-queries the provider's status API for the authoritative state.
//!
//! ## Acknowledgment policy
//!
//! Once a notification has been authenticated, the answer is HTTP 200 -- even when the order is unknown, the
//! write conflicted, or the database hiccuped. A non-2xx makes the provider redeliver the identical payload,
//! which cannot fix any of those conditions; redelivery is only useful for *transport-level* failures, which is
//! why verification-unavailable is the one authenticated case that returns 5xx.
use actix_web::{web, HttpResponse};
use log::*;
use midtrans_tools::MidtransApiError;
use serde_json::Value;
use warung_payment_engine::{
    db_types::ProviderReference,
    reconciliation::ProviderStatus,
    traits::{ReconciliationDatabase, ReconciliationError},
    ReconcileApi,
    ReconcileOutcome,
};
use wpg_common::Rupiah;

use crate::{
    data_objects::WebhookResponse,
    errors::ServerError,
    integrations::{
        doku::DokuNotification,
        midtrans::{self, MidtransNotification, TransactionVerifier},
    },
};

/// Notification endpoint for the signed-webhook provider. The signature middleware guards this route, so the
/// payload is trusted as-is.
pub async fn doku_webhook<B: ReconciliationDatabase>(
    api: web::Data<ReconcileApi<B>>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ServerError> {
    let payload = body.into_inner();
    let notification = DokuNotification::try_from_payload(payload)?;
    debug!("📩️ Signed notification for [{}]: {}", notification.reference, notification.status);
    reconcile_and_ack(
        api.get_ref(),
        &notification.reference,
        notification.status,
        notification.settled_amount,
        &notification.raw,
    )
    .await
}

/// Notification endpoint for the callback-verified provider. The inbound body is never trusted: only the
/// reference it names is used, and the status applied is the one the provider reports when we ask it directly.
pub async fn midtrans_webhook<B, V>(
    api: web::Data<ReconcileApi<B>>,
    verifier: web::Data<V>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ServerError>
where
    B: ReconciliationDatabase,
    V: TransactionVerifier,
{
    let payload = body.into_inner();
    let claim = MidtransNotification::try_from_payload(&payload)?;
    debug!("📩️ Unverified notification for [{}] claims status '{}'. Verifying.", claim.reference, claim.claimed_status);
    let record = match verifier.transaction_status(&claim.reference).await {
        Ok(record) => record,
        Err(MidtransApiError::TransactionNotFound(reference)) => {
            // The provider has never heard of this transaction. The notification is forged or garbled.
            warn!("🚨️ Notification names transaction [{reference}], but the provider has no record of it. Rejecting.");
            return Err(ServerError::AuthenticationFailed(format!(
                "Provider has no record of transaction {reference}"
            )));
        },
        Err(e) => {
            warn!("📩️ Could not verify notification for [{}]: {e}. Asking the provider to retry.", claim.reference);
            return Err(ServerError::VerificationUnavailable(e.to_string()));
        },
    };
    if record.transaction_status != claim.claimed_status {
        info!(
            "📩️ Claimed status '{}' for [{}] differs from the verified '{}'. Using the verified one.",
            claim.claimed_status, claim.reference, record.transaction_status
        );
    }
    let status = midtrans::normalize_status(&record.transaction_status, record.fraud_status.as_deref());
    let settled_amount = record.gross_amount.as_deref().and_then(midtrans::parse_gross_amount);
    let reference = ProviderReference::from(record.order_id.clone());
    reconcile_and_ack(api.get_ref(), &reference, status, settled_amount, &record.raw).await
}

/// Run the reconciler and map its outcome onto the acknowledgment policy described in the module docs.
async fn reconcile_and_ack<B: ReconciliationDatabase>(
    api: &ReconcileApi<B>,
    reference: &ProviderReference,
    status: ProviderStatus,
    settled_amount: Option<Rupiah>,
    raw_payload: &Value,
) -> Result<HttpResponse, ServerError> {
    let response = match api.reconcile(reference, status, settled_amount, raw_payload).await {
        Ok(ReconcileOutcome::Updated(order)) => WebhookResponse::for_order("Order status updated.", &order),
        Ok(ReconcileOutcome::Unchanged(order)) => {
            WebhookResponse::for_order("Notification already processed.", &order)
        },
        Ok(ReconcileOutcome::StaleIgnored { order, incoming }) => {
            WebhookResponse::for_order(format!("Out-of-order notification ({incoming}) ignored."), &order)
        },
        Ok(ReconcileOutcome::ManualReviewRequired { order, incoming }) => {
            WebhookResponse::for_order(format!("Conflicting status ({incoming}) flagged for manual review."), &order)
        },
        Err(ReconciliationError::OrderNotFound(reference)) => {
            // Acknowledged so the provider stops retrying. The payload is in the logs for the sweep to pick up.
            warn!("🚨️ Notification for unknown order reference [{reference}]. Payload: {raw_payload}");
            WebhookResponse::received("Notification received. No matching order.")
        },
        Err(ReconciliationError::WriteConflict(reference)) => {
            warn!(
                "📩️ Concurrent update raced this notification for [{reference}]. The other delivery won. Payload: \
                 {raw_payload}"
            );
            WebhookResponse::received("Notification received. A concurrent update already applied.")
        },
        Err(e) => {
            error!("📩️ Could not reconcile notification for [{reference}]: {e}. Payload: {raw_payload}");
            WebhookResponse::received("Notification received.")
        },
    };
    Ok(HttpResponse::Ok().json(response))
}
