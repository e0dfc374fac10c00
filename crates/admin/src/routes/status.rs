//! Deployment status report.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::config::env_presence;
use crate::db::{DatabaseProbe, TableCounts, stats};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Overall health reported by `GET /status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Ok,
    Degraded,
}

/// Identity of the running build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub built_at: Option<DateTime<Utc>>,
}

impl BuildInfo {
    /// Values embedded by the build script.
    #[must_use]
    pub fn current() -> Self {
        let commit = env!("MAISON_GIT_COMMIT");
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: (!commit.is_empty()).then_some(commit),
            built_at: env!("MAISON_BUILT_AT")
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

/// `GET /status` response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: Health,
    pub timestamp: DateTime<Utc>,
    pub build: BuildInfo,
    pub database: DatabaseProbe,
    pub tables: TableCounts,
    pub environment: BTreeMap<&'static str, bool>,
}

impl StatusReport {
    /// Assemble a report; the status follows database connectivity.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        build: BuildInfo,
        database: DatabaseProbe,
        tables: TableCounts,
        environment: impl IntoIterator<Item = (&'static str, bool)>,
    ) -> Self {
        let status = if database.connected {
            Health::Ok
        } else {
            Health::Degraded
        };
        Self {
            status,
            timestamp,
            build,
            database,
            tables,
            environment: environment.into_iter().collect(),
        }
    }
}

/// `GET /status`
///
/// Always answers `200`; failures are described in the body.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<StatusReport> {
    let database = stats::ping(state.pool()).await;
    let tables = if database.connected {
        stats::table_counts(state.pool()).await
    } else {
        TableCounts::default()
    };

    Json(StatusReport::new(
        Utc::now(),
        BuildInfo::current(),
        database,
        tables,
        env_presence(),
    ))
}
