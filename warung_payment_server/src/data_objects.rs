use serde::{Deserialize, Serialize};
use warung_payment_engine::db_types::{NewOrder, Order, OrderId};
use wpg_common::Rupiah;

/// The acknowledgment body returned to providers (and to the checkout flow): a human-readable message plus,
/// when an order was involved, its id and current status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl WebhookResponse {
    pub fn received<S: std::fmt::Display>(message: S) -> Self {
        Self { message: message.to_string(), order_id: None, status: None }
    }

    pub fn for_order<S: std::fmt::Display>(message: S, order: &Order) -> Self {
        Self {
            message: message.to_string(),
            order_id: Some(order.order_id.0.clone()),
            status: Some(order.status.to_string()),
        }
    }
}

/// A new order handed over by the checkout flow, before it redirects the customer to the payment page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIntake {
    pub order_id: String,
    /// The reference the provider will echo back. Defaults to the order id, which is what both supported
    /// providers do with the merchant invoice number.
    #[serde(default)]
    pub provider_reference: Option<String>,
    /// In the smallest currency unit.
    pub gross_amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

impl From<OrderIntake> for NewOrder {
    fn from(intake: OrderIntake) -> Self {
        let mut order = NewOrder::new(OrderId::from(intake.order_id), Rupiah::from(intake.gross_amount));
        if let Some(reference) = intake.provider_reference {
            order = order.with_reference(reference);
        }
        if let Some(currency) = intake.currency {
            order.currency = currency;
        }
        if let Some(email) = intake.customer_email {
            order = order.with_email(email);
        }
        order
    }
}
