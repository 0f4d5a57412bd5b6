//! API endpoints.

mod admin;
mod auth;
mod owner;
mod restaurants;
mod upload;
mod users;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Health check payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    server: &'static str,
    time: String,
    uptime_seconds: u64,
}

/// Liveness endpoint.
async fn health(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        server: "dishcovery",
        time: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// JSON 404 for unmatched API routes.
pub async fn not_found() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "Route not found",
            "code": "NOT_FOUND",
        })),
    )
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router())
        .nest("/restaurants", restaurants::router())
        .nest("/users", users::router())
        .nest("/owner", owner::router())
        .nest("/admin", admin::router())
        .merge(upload::router())
}
