//! Liveness and database check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = state.db.health_check().await;
    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": database_ok,
            "data": {
                "status": if database_ok { "ok" } else { "degraded" },
                "database": if database_ok { "connected" } else { "unavailable" },
                "version": env!("CARGO_PKG_VERSION"),
            },
        })),
    )
}
