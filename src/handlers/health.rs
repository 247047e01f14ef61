use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness plus a store ping: 503 when Mongo is unreachable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "payment-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {:#}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": "payment-service",
                    "version": env!("CARGO_PKG_VERSION")
                })),
            )
        }
    }
}
