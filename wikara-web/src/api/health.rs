//! Liveness endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Dashboard visits currently held in memory
    pub dashboard_visits: usize,
}

/// GET /health
///
/// Never calls the spreadsheet or the reference source.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "wikara-web",
        version: env!("CARGO_PKG_VERSION"),
        dashboard_visits: state.visits.len().await,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
