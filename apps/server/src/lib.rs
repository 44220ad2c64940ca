//! # stockbook-server
//!
//! HTTP/JSON boundary for Stockbook.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Server                                 │
//! │                                                                         │
//! │  SPA ───► HTTP (5000) ───► axum Router ───► stockbook-db ───► SQLite   │
//! │                │                 │                                      │
//! │                │                 └── ApiError → status + envelope       │
//! │                └── TraceLayer, CorsLayer                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ServerConfig`]: defaults, then `stockbook.toml`, then
//! `STOCKBOOK_*` environment variables.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the complete application router.
///
/// With `cors_allow_any` the API accepts requests from any origin;
/// otherwise no CORS headers are sent and only same-origin callers work.
pub fn build_router(state: AppState, cors_allow_any: bool) -> Router {
    let cors = if cors_allow_any {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
