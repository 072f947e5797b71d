//! Warung Payment Engine
//!
//! The reconciliation core of the Warung payment gateway. Payment providers deliver asynchronous webhook
//! notifications about transactions; this library owns everything that happens after a notification has been
//! authenticated:
//!
//! 1. The provider's status vocabulary is normalized into [`reconciliation::ProviderStatus`] and mapped onto the
//!    internal order lifecycle ([`db_types::OrderStatus`]).
//! 2. The transition policy is applied: replays are no-ops, terminal statuses are never rolled back to earlier
//!    stages, and contradicting terminal statuses are flagged for manual review rather than guessed at.
//! 3. The surviving updates are written to the order record with a compare-and-swap so that concurrent deliveries
//!    for the same order cannot interleave.
//!
//! Backends implement the [`traits::ReconciliationDatabase`] trait; SQLite is the only backend currently shipped.
//! You should never need to touch the database directly. Use [`ReconcileApi`] instead.
pub mod db_types;
pub mod reconciliation;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use reconciliation::{ReconcileApi, ReconcileOutcome};
