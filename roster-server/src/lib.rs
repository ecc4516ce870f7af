//! HTTP surface for the Roster user directory service.
//!
//! The binary entry point lives in `main.rs`; the router assembly and
//! everything behind it is exported here so the integration tests can
//! drive the real application.

pub mod infra;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the full application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .merge(routes::create_api_router())
        // Middleware layers, outer to inner: CORS, then request tracing.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Roster server is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe that exercises the store with a cheap listing.
async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.service.list().await {
        Ok(_) => Ok(Json(json!({
            "status": "healthy",
            "checks": { "store": "healthy" },
        }))),
        Err(err) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "checks": { "store": err.to_string() },
            })),
        )),
    }
}
