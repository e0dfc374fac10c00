//! Cart handlers.
//!
//! The cart lives in the visitor's session. Every mutation answers with the
//! full cart so the client can re-render without a second request.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use maison_core::state::{CartLine, CartLineKey, CartState, UiState};
use maison_core::{CurrencyCode, ProductId, format_price};

use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Cart response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub count: u32,
    pub subtotal: Decimal,
    pub subtotal_display: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Decimal,
    pub line_total_display: String,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    line: line.clone(),
                    line_total: line.line_total(),
                    line_total_display: format_price(line.line_total(), CurrencyCode::USD),
                })
                .collect(),
            count: cart.count(),
            subtotal: cart.subtotal(),
            subtotal_display: format_price(cart.subtotal(), CurrencyCode::USD),
        }
    }
}

/// Cart plus the chrome state the client should apply after an add.
#[derive(Debug, Serialize)]
pub struct CartAdded {
    pub cart: CartView,
    pub ui: UiState,
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Request body for `POST /cart/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// Request body for `POST /cart/update`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLine {
    #[serde(flatten)]
    pub key: CartLineKey,
    pub quantity: u32,
}

/// `GET /cart`
pub async fn show(visitor: Visitor) -> Json<CartView> {
    Json(CartView::from(&visitor.state.cart))
}

/// `POST /cart/add`
///
/// The product must be published and purchasable. When the product has
/// variants, the named variant must exist and have stock unless the product
/// allows backorders.
#[instrument(skip(state, visitor))]
pub async fn add(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Json(input): Json<AddToCart>,
) -> Result<Json<CartAdded>> {
    if input.quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let snapshot = state.catalog().snapshot().await?;
    let product = snapshot
        .products
        .iter()
        .find(|p| p.published && p.id == input.product_id)
        .ok_or_else(|| AppError::NotFound("product".to_string()))?;

    if product.variants.is_empty() {
        if !product.is_purchasable() {
            return Err(AppError::BadRequest("product is out of stock".to_string()));
        }
    } else {
        let variant = product
            .variants
            .iter()
            .find(|v| v.size == input.size && v.color == input.color)
            .ok_or_else(|| AppError::BadRequest("unknown size or color".to_string()))?;
        if variant.stock_quantity <= 0 && !product.allow_backorder {
            return Err(AppError::BadRequest("size is out of stock".to_string()));
        }
    }

    let line = CartLine::from_product(product, input.size, input.color, input.quantity);
    visitor.state.cart.add(line);
    visitor.save_cart().await?;
    visitor.state.ui.set_cart_drawer(true);

    Ok(Json(CartAdded {
        cart: CartView::from(&visitor.state.cart),
        ui: visitor.state.ui,
    }))
}

/// `POST /cart/update`
///
/// A quantity of zero removes the line.
#[instrument(skip(visitor))]
pub async fn update(mut visitor: Visitor, Json(input): Json<UpdateLine>) -> Result<Json<CartView>> {
    if !visitor.state.cart.update_quantity(&input.key, input.quantity) {
        return Err(AppError::NotFound("cart line".to_string()));
    }
    visitor.save_cart().await?;
    Ok(Json(CartView::from(&visitor.state.cart)))
}

/// `POST /cart/remove`
#[instrument(skip(visitor))]
pub async fn remove(mut visitor: Visitor, Json(key): Json<CartLineKey>) -> Result<Json<CartView>> {
    if !visitor.state.cart.remove(&key) {
        return Err(AppError::NotFound("cart line".to_string()));
    }
    visitor.save_cart().await?;
    Ok(Json(CartView::from(&visitor.state.cart)))
}

/// `POST /cart/clear`
pub async fn clear(mut visitor: Visitor) -> Result<Json<CartView>> {
    visitor.state.cart.clear();
    visitor.save_cart().await?;
    Ok(Json(CartView::from(&visitor.state.cart)))
}

/// `GET /cart/count`
pub async fn count(visitor: Visitor) -> Json<CartCount> {
    Json(CartCount {
        count: visitor.state.cart.count(),
    })
}
