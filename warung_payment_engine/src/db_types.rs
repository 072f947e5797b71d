use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use wpg_common::Rupiah;

//--------------------------------------      OrderId       ----------------------------------------------------------
/// The merchant-assigned order identifier, created by the checkout flow before any webhook exists.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------  ProviderReference  ---------------------------------------------------------
/// The identifier the payment provider uses for a transaction. This is the canonical join key for webhook
/// notifications: every reference resolves to at most one order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct ProviderReference(pub String);

impl From<String> for ProviderReference {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProviderReference {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ProviderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ProviderReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     OrderStatus     ---------------------------------------------------------
/// The internal order lifecycle. The checkout flow creates orders as `Pending`; the reconciliation core only ever
/// drives forward transitions from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Awaiting payment completion (e.g. a bank transfer has been issued but not settled).
    Pending,
    /// Funds captured and settled. Terminal.
    Paid,
    /// Explicitly denied by the processor or failed the fraud check. Terminal.
    Denied,
    /// Cancelled by the user or the provider. Terminal.
    Cancelled,
    /// The time-to-pay window elapsed. Terminal.
    Expired,
    /// A full or partial refund was issued after payment. Terminal.
    Refunded,
    /// Funds captured but flagged by the provider's fraud scoring. Requires a manual merchant decision.
    FraudReview,
    /// The provider sent a status code we do not recognise. Kept for manual triage.
    Unknown,
}

impl OrderStatus {
    /// Terminal statuses are never silently overwritten by a stale, earlier-stage notification.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Denied | Self::Cancelled | Self::Expired | Self::Refunded)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Denied => write!(f, "Denied"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
            OrderStatus::Expired => write!(f, "Expired"),
            OrderStatus::Refunded => write!(f, "Refunded"),
            OrderStatus::FraudReview => write!(f, "FraudReview"),
            OrderStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Denied" => Ok(Self::Denied),
            "Cancelled" => Ok(Self::Cancelled),
            "Expired" => Ok(Self::Expired),
            "Refunded" => Ok(Self::Refunded),
            "FraudReview" => Ok(Self::FraudReview),
            "Unknown" => Ok(Self::Unknown),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Unknown");
            OrderStatus::Unknown
        })
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub provider_reference: ProviderReference,
    pub status: OrderStatus,
    pub gross_amount: Rupiah,
    pub currency: String,
    /// The last-seen raw provider payload, serialized as JSON. Retained for audit and debugging only.
    pub payment_metadata: Option<String>,
    pub customer_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_webhook_at: Option<DateTime<Utc>>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
/// An order as handed over by the upstream checkout flow, before any payment notification has arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    /// The reference the provider will echo back in notifications. For the supported providers this is the
    /// merchant invoice number, so it defaults to the order id.
    pub provider_reference: ProviderReference,
    pub gross_amount: Rupiah,
    pub currency: String,
    pub customer_email: Option<String>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, gross_amount: Rupiah) -> Self {
        let provider_reference = ProviderReference::from(order_id.0.clone());
        Self {
            order_id,
            provider_reference,
            gross_amount,
            currency: wpg_common::IDR_CURRENCY_CODE.to_string(),
            customer_email: None,
        }
    }

    pub fn with_reference<R: Into<ProviderReference>>(mut self, reference: R) -> Self {
        self.provider_reference = reference.into();
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.customer_email = Some(email.into());
        self
    }
}
