//! Signed-in customer's order history.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use maison_core::OrderId;
use maison_core::catalog::{Order, OrderSummary};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderSummary>,
}

/// `GET /account/orders`
#[instrument(skip(state, user))]
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<OrderList>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(OrderList {
        orders: orders.iter().map(Order::summary).collect(),
    }))
}

/// `GET /account/orders/{id}`
///
/// Another customer's order answers 404, the same as a missing one.
#[instrument(skip(state, user))]
pub async fn order(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get_for_user(user.id, OrderId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("order".to_string()))
}
