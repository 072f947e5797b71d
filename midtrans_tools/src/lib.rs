//! A small client for the Midtrans Core API, covering the single call the payment gateway needs: fetching the
//! authoritative status of a transaction. Webhook notifications are never trusted directly; the gateway re-queries
//! the status endpoint and reconciles against the answer, which defeats payload tampering outright.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::MidtransApi;
pub use config::MidtransConfig;
pub use data_objects::TransactionRecord;
pub use error::MidtransApiError;
