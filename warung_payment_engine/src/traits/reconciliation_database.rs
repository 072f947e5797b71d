use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderStatus, ProviderReference};

/// The record-store contract the reconciliation core depends on.
///
/// Each webhook invocation is independent and stateless; the only coordination point between concurrent deliveries
/// for the same order is [`Self::checked_status_update`], which must be an atomic compare-and-swap on the order's
/// current status.
#[allow(async_fn_in_trait)]
pub trait ReconciliationDatabase {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Fetch the order matching the given provider reference. There is at most one: the reference column carries a
    /// unique index.
    async fn fetch_order_by_reference(
        &self,
        reference: &ProviderReference,
    ) -> Result<Option<Order>, ReconciliationError>;

    /// Store a new order handed over by the checkout flow.
    ///
    /// This call is idempotent. If an order with the same provider reference already exists, it is returned
    /// unchanged and the second element of the result is `false`.
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), ReconciliationError>;

    /// Atomically move the order identified by `reference` from `expected` to `target` status, recording the raw
    /// provider payload and bumping `updated_at` / `last_webhook_at` in the same write.
    ///
    /// The write only applies if the stored status still equals `expected`; this is what serializes concurrent
    /// notifications for the same order. Returns the updated order, or `None` if the compare-and-swap missed
    /// because another delivery got there first.
    async fn checked_status_update(
        &self,
        reference: &ProviderReference,
        expected: OrderStatus,
        target: OrderStatus,
        metadata: &str,
    ) -> Result<Option<Order>, ReconciliationError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), ReconciliationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Internal database engine error: {0}")]
    DatabaseError(String),
    #[error("No order matches provider reference {0}")]
    OrderNotFound(ProviderReference),
    #[error("Conditional status update for {0} was beaten by a concurrent write")]
    WriteConflict(ProviderReference),
    #[error("Could not serialize payment metadata: {0}")]
    InvalidMetadata(String),
}

impl From<sqlx::Error> for ReconciliationError {
    fn from(e: sqlx::Error) -> Self {
        ReconciliationError::DatabaseError(e.to_string())
    }
}
