//! Database probes for `GET /status`.
//!
//! Nothing here returns an error: a failed probe is reported in the
//! response body instead.

use std::time::Instant;

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

/// Connectivity check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProbe {
    pub connected: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// Row counts per catalog table; `None` when the count failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub products: Option<i64>,
    pub categories: Option<i64>,
    pub collections: Option<i64>,
    pub orders: Option<i64>,
    pub reviews: Option<i64>,
}

/// Run `SELECT 1` and time it.
#[instrument(skip(pool))]
pub async fn ping(pool: &PgPool) -> DatabaseProbe {
    let started = Instant::now();
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => DatabaseProbe {
            connected: true,
            latency_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            DatabaseProbe {
                connected: false,
                latency_ms: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Count rows in each catalog table.
#[instrument(skip(pool))]
pub async fn table_counts(pool: &PgPool) -> TableCounts {
    let (products, categories, collections, orders, reviews) = tokio::join!(
        count(pool, "products"),
        count(pool, "categories"),
        count(pool, "collections"),
        count(pool, "orders"),
        count(pool, "reviews"),
    );
    TableCounts {
        products,
        categories,
        collections,
        orders,
        reviews,
    }
}

/// `table` is always one of the constants above, never caller input.
async fn count(pool: &PgPool, table: &'static str) -> Option<i64> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .inspect_err(|e| tracing::warn!(table, error = %e, "row count failed"))
        .ok()
}
