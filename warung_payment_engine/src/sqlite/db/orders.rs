use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderStatus, ProviderReference},
    traits::ReconciliationError,
};

/// Inserts the order into the database, returning `false` in the second parameter if an order with the same
/// provider reference already exists.
///
/// The conflict handling lives in the INSERT itself, so two concurrent registrations of the same reference
/// cannot race: one wins the insert, the other takes the existing-row path.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<(Order, bool), ReconciliationError> {
    let reference = order.provider_reference.clone();
    let inserted = match insert_order(order, &mut *conn).await? {
        Some(order) => {
            debug!("📝️ Order [{}] inserted with id {}", order.order_id, order.id);
            (order, true)
        },
        None => {
            let existing = fetch_order_by_reference(&reference, conn).await?.ok_or_else(|| {
                ReconciliationError::DatabaseError(format!(
                    "Order with reference {reference} hit a conflict on insert but could not be fetched"
                ))
            })?;
            (existing, false)
        },
    };
    Ok(inserted)
}

/// Inserts a new order using the given connection. Returns `None` when an order with the same provider reference
/// is already stored.
async fn insert_order(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, ReconciliationError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                provider_reference,
                gross_amount,
                currency,
                customer_email
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (provider_reference) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.provider_reference)
    .bind(order.gross_amount.value())
    .bind(order.currency)
    .bind(order.customer_email)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Returns the order matching the given provider reference, if any. The reference column carries a unique index,
/// so there is at most one.
pub async fn fetch_order_by_reference(
    reference: &ProviderReference,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE provider_reference = $1")
        .bind(reference.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Applies a status update as a compare-and-swap: the write only lands if the stored status still equals
/// `expected`. Returns `None` when the guard failed, either because a concurrent delivery changed the status
/// first or because the order vanished.
pub async fn checked_status_update(
    reference: &ProviderReference,
    expected: OrderStatus,
    target: OrderStatus,
    metadata: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, ReconciliationError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = $1,
                payment_metadata = $2,
                updated_at = CURRENT_TIMESTAMP,
                last_webhook_at = CURRENT_TIMESTAMP
            WHERE provider_reference = $3 AND status = $4
            RETURNING *;
        "#,
    )
    .bind(target.to_string())
    .bind(metadata)
    .bind(reference.as_str())
    .bind(expected.to_string())
    .fetch_optional(conn)
    .await?;
    Ok(result)
}
