//! Order table and fulfillment updates.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::instrument;

use maison_core::OrderId;
use maison_core::catalog::query::MAX_PAGE_SIZE;
use maison_core::catalog::{Order, OrderUpdate};

use super::{ADMIN_PAGE_SIZE, json_body};
use crate::db::{OrderFilter, OrderListing, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Order table query string.
///
/// Paging values that do not parse fall back to their defaults. An unknown
/// `status` or `paymentStatus` is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderParams {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl OrderParams {
    fn into_filter(self) -> Result<OrderFilter> {
        Ok(OrderFilter {
            status: parse_enum("status", self.status.as_deref())?,
            payment_status: parse_enum("paymentStatus", self.payment_status.as_deref())?,
            search: self.q.filter(|q| !q.trim().is_empty()),
            page: parse(self.page.as_deref()).unwrap_or(1),
            limit: parse(self.limit.as_deref())
                .unwrap_or(ADMIN_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        })
    }
}

fn parse<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// A blank value means "any"; anything else must name a variant.
fn parse_enum<T: std::str::FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("unknown {field}: {v}"))),
    }
}

/// `GET /orders`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<OrderParams>,
) -> Result<Json<OrderListing>> {
    let listing = OrderRepository::new(state.pool())
        .list(&params.into_filter()?)
        .await?;
    Ok(Json(listing))
}

/// `GET /orders/{id}`
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("order".to_string()))
}

/// `PATCH /orders/{id}`
///
/// Leaving a terminal status answers `409`.
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<OrderUpdate>, JsonRejection>,
) -> Result<Json<Order>> {
    let update = json_body(payload)?;
    if update.is_empty() {
        return Err(AppError::BadRequest("nothing to update".to_string()));
    }

    let order = OrderRepository::new(state.pool())
        .update(OrderId::new(id), &update)
        .await?;
    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use maison_core::{OrderStatus, PaymentStatus};

    use super::*;

    #[test]
    fn test_params_parse() {
        let filter = OrderParams {
            status: Some("shipped".to_string()),
            payment_status: Some(" ".to_string()),
            q: Some("  ".to_string()),
            page: Some("3".to_string()),
            limit: Some("1000".to_string()),
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert_eq!(filter.payment_status, None::<PaymentStatus>);
        assert_eq!(filter.search, None);
        assert_eq!(filter.page, 3);
        assert_eq!(filter.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_unknown_status_filter_rejected() {
        let err = OrderParams {
            payment_status: Some("lost".to_string()),
            ..OrderParams::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "unknown paymentStatus: lost"));
    }

    #[test]
    fn test_params_defaults() {
        let filter = OrderParams::default().into_filter().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, ADMIN_PAGE_SIZE);
    }
}
