use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::logging::{COMPONENT, SUBSYSTEM};
use serde_json::json;

use crate::state::AppState;

/// Liveness check. Pings the pool when notes are backed by PostgreSQL.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(db) = &state.db else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        );
    };

    let pool = notekeep_db::pool_stats(db.pool());
    match sqlx::query("SELECT 1").execute(db.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "connected",
                "pool": pool,
            })),
        ),
        Err(e) => {
            tracing::error!(
                { SUBSYSTEM } = "api",
                { COMPONENT } = "health",
                error = %e,
                "Database ping failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "database": "unreachable",
                    "pool": pool,
                })),
            )
        }
    }
}
