//! The non-webhook routes: health check, order hand-over from the checkout flow, and a manual status lookup.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use warung_payment_engine::{
    db_types::{NewOrder, ProviderReference},
    traits::{ReconciliationDatabase, ReconciliationError},
    ReconcileApi,
};

use crate::{
    data_objects::{OrderIntake, WebhookResponse},
    errors::ServerError,
};

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Order hand-over from the checkout flow, called before the customer is redirected to the payment page.
/// Idempotent: re-posting the same order is acknowledged without creating a duplicate.
pub async fn register_order<B: ReconciliationDatabase>(
    api: web::Data<ReconcileApi<B>>,
    body: web::Json<OrderIntake>,
) -> Result<HttpResponse, ServerError> {
    let intake = body.into_inner();
    if intake.order_id.trim().is_empty() {
        return Err(ServerError::InvalidPayload("order_id must not be empty".to_string()));
    }
    if intake.gross_amount <= 0 {
        return Err(ServerError::InvalidPayload("gross_amount must be positive".to_string()));
    }
    let (order, inserted) = api
        .register_order(NewOrder::from(intake))
        .await
        .map_err(|e| ServerError::BackendError(e.to_string()))?;
    let message = if inserted { "Order registered." } else { "Order was already registered." };
    Ok(HttpResponse::Ok().json(WebhookResponse::for_order(message, &order)))
}

/// Manual status lookup by provider reference, for the checkout flow's "check my payment" fallback when a
/// notification has gone missing.
pub async fn order_status<B: ReconciliationDatabase>(
    api: web::Data<ReconcileApi<B>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let reference = ProviderReference::from(path.into_inner());
    let order = api.order_by_reference(&reference).await.map_err(|e| match e {
        ReconciliationError::OrderNotFound(r) => ServerError::NoRecordFound(format!("No order with reference {r}")),
        other => ServerError::BackendError(other.to_string()),
    })?;
    Ok(HttpResponse::Ok().json(order))
}
