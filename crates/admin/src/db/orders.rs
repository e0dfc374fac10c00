//! Order listing and fulfillment updates.

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use maison_core::catalog::{Order, OrderUpdate};
use maison_core::projection::{OrderItemRow, OrderRow, assemble_orders};
use maison_core::{OrderId, OrderStatus, PaymentStatus};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, order_number, user_id, email, status, payment_status, \
     subtotal, shipping, tax, total, shipping_address, tracking_number, notes, \
     created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, product_slug, \
     product_image, size, color, quantity, unit_price, total_price";

/// Every filter is optional; `NULL` binds disable a predicate.
const FILTER_PREDICATE: &str = r"
    ($1::text IS NULL OR status = $1)
    AND ($2::text IS NULL OR payment_status = $2)
    AND ($3::text IS NULL OR order_number ILIKE $3 OR email ILIKE $3)
";

/// Admin order table filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Substring of the order number or customer email.
    pub search: Option<String>,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
}

/// One page of orders, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListing {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// Repository for orders across all customers.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One filtered page of orders with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &OrderFilter) -> Result<OrderListing, RepositoryError> {
        let page = filter.page.max(1);
        let limit = filter.limit.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);
        let status = filter.status.map(OrderStatus::as_str);
        let payment_status = filter.payment_status.map(PaymentStatus::as_str);
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)));

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM orders WHERE {FILTER_PREDICATE}"
        ))
        .bind(status)
        .bind(payment_status)
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {FILTER_PREDICATE} \
             ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
        ))
        .bind(status)
        .bind(payment_status)
        .bind(pattern.as_deref())
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|o| o.id).collect();
        let items: Vec<OrderItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(OrderListing {
            orders: assemble_orders(rows, items),
            total,
            page,
            limit,
        })
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<OrderItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Order::from((row, items))))
    }

    /// Apply a status, payment or tracking change.
    ///
    /// The row is locked while the change is validated, so two concurrent
    /// updates cannot both leave a terminal status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID and
    /// `RepositoryError::Conflict` when the order is already terminal.
    #[instrument(skip(self))]
    pub async fn update(&self, id: OrderId, update: &OrderUpdate) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        let mut order = Order::from((row, Vec::new()));
        update
            .apply(&mut order)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        sqlx::query(
            r"
            UPDATE orders
            SET status = $2, payment_status = $3, tracking_number = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.tracking_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(order_id = %id, status = %order.status, "order updated");

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }
}

/// Escape `LIKE` metacharacters so a search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
