//! The reconciliation core: normalized provider vocabulary, the status mapping table, the transition policy, and
//! the [`ReconcileApi`] that ties them to a backend.
mod api;
mod status;

pub use api::{ReconcileApi, ReconcileOutcome};
pub use status::{FraudOutcome, ProviderStatus, TransitionDecision};
