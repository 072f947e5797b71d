use std::fmt::Display;

use crate::db_types::OrderStatus;

/// The provider-side fraud-scoring outcome attached to a card capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FraudOutcome {
    Accept,
    Challenge,
    Deny,
}

/// Verified transaction status, normalized across provider vocabularies.
///
/// Providers use different words for the same lifecycle events (`settlement` vs `SUCCESS`, `expire` vs `EXPIRED`).
/// Each provider integration translates its own vocabulary into this enum before reconciliation; the mapping onto
/// the internal order lifecycle then lives in exactly one place, [`ProviderStatus::target_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    /// An authorized card capture, qualified by the provider's fraud check.
    Capture(FraudOutcome),
    /// Funds have been captured and the transaction is final.
    Settlement,
    /// Payment instructions issued, completion still outstanding (e.g. bank transfer).
    AwaitingPayment,
    /// Explicit user or system cancellation.
    Cancelled,
    /// The time-to-pay window elapsed.
    Expired,
    /// Explicit denial by the processor.
    Denied,
    /// A full or partial refund was issued.
    Refund { partial: bool },
    /// A status code we do not recognise; carried verbatim for triage.
    Unrecognized(String),
}

impl Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::Capture(FraudOutcome::Accept) => write!(f, "capture (fraud check passed)"),
            ProviderStatus::Capture(FraudOutcome::Challenge) => write!(f, "capture (fraud check flagged)"),
            ProviderStatus::Capture(FraudOutcome::Deny) => write!(f, "capture (fraud check failed)"),
            ProviderStatus::Settlement => write!(f, "settlement"),
            ProviderStatus::AwaitingPayment => write!(f, "awaiting payment"),
            ProviderStatus::Cancelled => write!(f, "cancelled"),
            ProviderStatus::Expired => write!(f, "expired"),
            ProviderStatus::Denied => write!(f, "denied"),
            ProviderStatus::Refund { partial: true } => write!(f, "partial refund"),
            ProviderStatus::Refund { partial: false } => write!(f, "refund"),
            ProviderStatus::Unrecognized(s) => write!(f, "unrecognized ({s})"),
        }
    }
}

impl ProviderStatus {
    /// The canonical provider-signal to internal-status mapping.
    pub fn target_status(&self) -> OrderStatus {
        match self {
            ProviderStatus::Capture(FraudOutcome::Accept) => OrderStatus::Paid,
            ProviderStatus::Capture(FraudOutcome::Challenge) => OrderStatus::FraudReview,
            ProviderStatus::Capture(FraudOutcome::Deny) => OrderStatus::Denied,
            ProviderStatus::Settlement => OrderStatus::Paid,
            ProviderStatus::AwaitingPayment => OrderStatus::Pending,
            ProviderStatus::Cancelled => OrderStatus::Cancelled,
            ProviderStatus::Expired => OrderStatus::Expired,
            ProviderStatus::Denied => OrderStatus::Denied,
            ProviderStatus::Refund { .. } => OrderStatus::Refunded,
            ProviderStatus::Unrecognized(_) => OrderStatus::Unknown,
        }
    }
}

/// What to do with a verified notification, given the currently stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Apply the update.
    Apply,
    /// The stored status already matches. Replay of an earlier notification; leave the record untouched.
    AlreadyApplied,
    /// The stored status is terminal and the incoming one is an earlier stage. Out-of-order duplicate; ignore it.
    RefuseStale,
    /// Two contradicting terminal statuses. Never resolved automatically; flag for a human.
    ManualReview,
}

/// The transition policy for the order lifecycle.
///
/// Forward transitions apply; replays and stale out-of-order deliveries are no-ops. The one terminal-to-terminal
/// pair that is applied automatically is `Paid -> Refunded`; any other contradiction between terminal statuses
/// (e.g. a chargeback-style `Paid -> Denied`) requires a manual decision.
pub fn decide_transition(current: OrderStatus, target: OrderStatus) -> TransitionDecision {
    if current == target {
        return TransitionDecision::AlreadyApplied;
    }
    match (current.is_terminal(), target.is_terminal()) {
        (false, _) => TransitionDecision::Apply,
        (true, false) => TransitionDecision::RefuseStale,
        (true, true) => {
            if current == OrderStatus::Paid && target == OrderStatus::Refunded {
                TransitionDecision::Apply
            } else {
                TransitionDecision::ManualReview
            }
        },
    }
}
