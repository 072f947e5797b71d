use std::fmt::Debug;

use log::*;
use serde_json::Value;
use wpg_common::Rupiah;

use crate::{
    db_types::{NewOrder, Order, OrderStatus, ProviderReference},
    reconciliation::status::{decide_transition, ProviderStatus, TransitionDecision},
    traits::{ReconciliationDatabase, ReconciliationError},
};

/// The result of reconciling one verified notification against the order record.
///
/// Everything here is an *acknowledged* outcome. All four variants are reported back to the provider with
/// HTTP 200 by the server; the distinctions only matter for logging and the response message.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// The order record was moved to a new status.
    Updated(Order),
    /// The stored state already matched the notification. Replays land here.
    Unchanged(Order),
    /// The notification carried an earlier-stage status than the stored terminal one and was ignored.
    StaleIgnored { order: Order, incoming: OrderStatus },
    /// The notification contradicts a stored terminal status and needs a human decision. Nothing was written.
    ManualReviewRequired { order: Order, incoming: OrderStatus },
}

impl ReconcileOutcome {
    pub fn order(&self) -> &Order {
        match self {
            ReconcileOutcome::Updated(o) | ReconcileOutcome::Unchanged(o) => o,
            ReconcileOutcome::StaleIgnored { order, .. } => order,
            ReconcileOutcome::ManualReviewRequired { order, .. } => order,
        }
    }
}

/// `ReconcileApi` is the primary API for applying verified payment notifications to order records.
///
/// Callers are responsible for authenticating the notification first (signature or callback verification); this
/// API trusts the `verified` status it is handed.
pub struct ReconcileApi<B> {
    db: B,
}

impl<B> Debug for ReconcileApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconcileApi")
    }
}

impl<B> ReconcileApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReconcileApi<B>
where B: ReconciliationDatabase
{
    /// Apply a verified notification to the order matching `reference`.
    ///
    /// The provider status is mapped onto the internal lifecycle, the transition policy is consulted, and any
    /// surviving update is written as a single compare-and-swap on the status that was read. Replaying the same
    /// notification is a no-op in effect: the stored row is left byte-identical.
    ///
    /// ## Failure modes
    /// - [`ReconciliationError::OrderNotFound`] if no order matches the reference. Nothing is written; the caller
    ///   should log and acknowledge so the provider does not retry.
    /// - [`ReconciliationError::WriteConflict`] if a concurrent delivery changed the status between our read and
    ///   our write. The caller keeps the payload for a reconciliation sweep.
    pub async fn reconcile(
        &self,
        reference: &ProviderReference,
        verified: ProviderStatus,
        settled_amount: Option<Rupiah>,
        raw_payload: &Value,
    ) -> Result<ReconcileOutcome, ReconciliationError> {
        let target = verified.target_status();
        if let ProviderStatus::Unrecognized(code) = &verified {
            warn!("🔄️ Provider sent unrecognized status '{code}' for [{reference}]. Recording as Unknown for triage.");
        }
        let order = self
            .db
            .fetch_order_by_reference(reference)
            .await?
            .ok_or_else(|| ReconciliationError::OrderNotFound(reference.clone()))?;
        if let Some(amount) = settled_amount {
            if amount != order.gross_amount {
                warn!(
                    "🔄️ Settled amount {amount} for [{reference}] does not match the stored gross amount {}. \
                     Continuing, but this wants a look.",
                    order.gross_amount
                );
            }
        }
        match decide_transition(order.status, target) {
            TransitionDecision::Apply => {
                let metadata = serde_json::to_string(raw_payload)
                    .map_err(|e| ReconciliationError::InvalidMetadata(e.to_string()))?;
                let updated = self
                    .db
                    .checked_status_update(reference, order.status, target, &metadata)
                    .await?
                    .ok_or_else(|| ReconciliationError::WriteConflict(reference.clone()))?;
                info!("🔄️ Order {} moved {} -> {target} ({verified})", updated.order_id, order.status);
                Ok(ReconcileOutcome::Updated(updated))
            },
            TransitionDecision::AlreadyApplied => {
                debug!("🔄️ Order {} is already {target}. Duplicate notification ignored.", order.order_id);
                Ok(ReconcileOutcome::Unchanged(order))
            },
            TransitionDecision::RefuseStale => {
                warn!(
                    "🔄️ Ignoring out-of-order notification for {}: stored status {} is terminal, incoming was \
                     {target} ({verified}).",
                    order.order_id, order.status
                );
                Ok(ReconcileOutcome::StaleIgnored { order, incoming: target })
            },
            TransitionDecision::ManualReview => {
                error!(
                    "🔄️ Order {} is {} but the provider now reports {target} ({verified}). This contradiction is \
                     not resolved automatically. Payload: {raw_payload}",
                    order.order_id, order.status
                );
                Ok(ReconcileOutcome::ManualReviewRequired { order, incoming: target })
            },
        }
    }

    /// Register an order handed over by the checkout flow. Idempotent: replaying the same order returns the
    /// existing record and `false`.
    pub async fn register_order(&self, order: NewOrder) -> Result<(Order, bool), ReconciliationError> {
        let (order, inserted) = self.db.insert_order(order).await?;
        if inserted {
            info!("🔄️ Order {} registered with reference {}", order.order_id, order.provider_reference);
        } else {
            debug!("🔄️ Order {} was already registered. Nothing to do.", order.order_id);
        }
        Ok((order, inserted))
    }

    /// Fetch the stored order for a provider reference, for the manual status-check fallback.
    pub async fn order_by_reference(&self, reference: &ProviderReference) -> Result<Order, ReconciliationError> {
        self.db
            .fetch_order_by_reference(reference)
            .await?
            .ok_or_else(|| ReconciliationError::OrderNotFound(reference.clone()))
    }
}
