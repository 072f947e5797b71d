//! Backend trait definitions for the payment engine. Specific stores (currently SQLite) implement
//! [`ReconciliationDatabase`] in order to act as the record store behind [`crate::ReconcileApi`].
mod reconciliation_database;

pub use reconciliation_database::{ReconciliationDatabase, ReconciliationError};
