//! Status enums for orders, payments and collections.
//!
//! All of these are stored as lowercase text columns and travel over the API
//! in the same lowercase form.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a status value from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

impl ParseStatusError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Order fulfillment lifecycle.
///
/// Orders are created on checkout as `Pending` and moved forward by admin
/// action. `Delivered`, `Cancelled` and `Refunded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Attempted to move an order out of a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order is {from} and can no longer change to {to}")]
pub struct StatusTransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Label and CSS classes for rendering a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBadge {
    pub label: &'static str,
    pub class: &'static str,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Lowercase text form used in the database and API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Whether no further status change is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    /// Validate an admin status change.
    ///
    /// Setting the current status again is a no-op and always allowed.
    ///
    /// # Errors
    ///
    /// Returns `StatusTransitionError` when the order is already terminal.
    pub fn transition_to(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self == next || !self.is_terminal() {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// Badge label and classes for order tables.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        let (label, class) = match self {
            Self::Pending => ("Pending", "bg-yellow-100 text-yellow-800"),
            Self::Confirmed => ("Confirmed", "bg-blue-100 text-blue-800"),
            Self::Processing => ("Processing", "bg-indigo-100 text-indigo-800"),
            Self::Shipped => ("Shipped", "bg-purple-100 text-purple-800"),
            Self::Delivered => ("Delivered", "bg-green-100 text-green-800"),
            Self::Cancelled => ("Cancelled", "bg-red-100 text-red-800"),
            Self::Refunded => ("Refunded", "bg-gray-100 text-gray-800"),
        };
        StatusBadge { label, class }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError::new("order status", s))
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Lowercase text form used in the database and API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Badge label and classes for order tables.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        let (label, class) = match self {
            Self::Pending => ("Awaiting payment", "bg-yellow-100 text-yellow-800"),
            Self::Paid => ("Paid", "bg-green-100 text-green-800"),
            Self::Failed => ("Failed", "bg-red-100 text-red-800"),
            Self::Refunded => ("Refunded", "bg-gray-100 text-gray-800"),
        };
        StatusBadge { label, class }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ParseStatusError::new("payment status", s)),
        }
    }
}

/// Kind of curated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Featured,
    Style,
    Seasonal,
    #[default]
    Curated,
}

impl CollectionType {
    /// Lowercase text form used in the database and API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Style => "style",
            Self::Seasonal => "seasonal",
            Self::Curated => "curated",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionType {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "style" => Ok(Self::Style),
            "seasonal" => Ok(Self::Seasonal),
            "curated" => Ok(Self::Curated),
            _ => Err(ParseStatusError::new("collection type", s)),
        }
    }
}

/// Role recorded on an account profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    #[default]
    Customer,
    Admin,
}

impl ProfileRole {
    /// Lowercase text form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for ProfileRole {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseStatusError::new("profile role", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trips_text() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
                OrderStatus::Refunded
            ]
        );
    }

    #[test]
    fn test_transition_from_open_status() {
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Shipped),
            Ok(OrderStatus::Shipped)
        );
        assert_eq!(
            OrderStatus::Shipped.transition_to(OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn test_transition_out_of_terminal_rejected() {
        let err = OrderStatus::Delivered
            .transition_to(OrderStatus::Processing)
            .unwrap_err();
        assert_eq!(err.to_string(), "order is delivered and can no longer change to processing");
        assert_eq!(
            OrderStatus::Cancelled.transition_to(OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn test_status_badges() {
        assert_eq!(OrderStatus::Delivered.badge().label, "Delivered");
        assert!(OrderStatus::Cancelled.badge().class.contains("red"));
        assert_eq!(PaymentStatus::Pending.badge().label, "Awaiting payment");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&CollectionType::Seasonal).unwrap();
        assert_eq!(json, "\"seasonal\"");
        let parsed: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Paid);
    }
}
