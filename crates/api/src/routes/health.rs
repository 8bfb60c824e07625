//! `GET /health`, mounted at the root next to `/api`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use margin_core::types::Date;
use serde::Serialize;

use crate::handlers::project::today;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `"ok"`, or `"degraded"` when Postgres does not answer.
    pub status: &'static str,
    pub database: &'static str,
    /// The date project costs are currently accrued to.
    pub calculation_date: Date,
}

/// 200 while the database answers, 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let (code, status, database) = match margin_db::health_check(&state.pool).await {
        Ok(()) => (StatusCode::OK, "ok", "reachable"),
        Err(err) => {
            tracing::warn!(error = %err, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        }
    };

    let report = HealthReport {
        status,
        database,
        calculation_date: today(),
    };
    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
