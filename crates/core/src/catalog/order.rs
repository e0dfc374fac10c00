//! Orders and their purchased-item snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    CurrencyCode, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, StatusBadge,
    StatusTransitionError, UserId, format_price,
};

/// A placed order.
///
/// Items are a snapshot taken at checkout; only the status fields and
/// tracking number change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: Option<UserId>,
    pub email: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: Option<ShippingAddress>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One purchased line, denormalized at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    /// `None` once the product has been deleted from the catalog.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Delivery address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl Order {
    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }

    /// Summary row for order tables and account history.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            order_number: self.order_number.clone(),
            status: self.status,
            status_badge: self.status.badge(),
            payment_status: self.payment_status,
            payment_badge: self.payment_status.badge(),
            total: format_price(self.total, CurrencyCode::USD),
            item_count: self.item_count(),
            created_at: self.created_at,
        }
    }
}

/// Compact order row for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub status_badge: StatusBadge,
    pub payment_status: PaymentStatus,
    pub payment_badge: StatusBadge,
    pub total: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Admin change to an order's mutable fields; absent fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// An empty string clears the tracking number.
    #[serde(default)]
    pub tracking_number: Option<String>,
}

impl OrderUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none() && self.tracking_number.is_none()
    }

    /// Apply the change to `order`.
    ///
    /// # Errors
    ///
    /// Returns `StatusTransitionError` when the order is in a terminal status
    /// and the update would move it out; `order` is left untouched.
    pub fn apply(&self, order: &mut Order) -> Result<(), StatusTransitionError> {
        let status = match self.status {
            Some(next) => order.status.transition_to(next)?,
            None => order.status,
        };
        order.status = status;
        if let Some(payment) = self.payment_status {
            order.payment_status = payment;
        }
        if let Some(tracking) = &self.tracking_number {
            let tracking = tracking.trim();
            order.tracking_number = (!tracking.is_empty()).then(|| tracking.to_owned());
        }
        Ok(())
    }
}
