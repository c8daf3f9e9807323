//! wikara-web library - survey form and completion dashboard
//!
//! Serves the form and dashboard pages plus the JSON API behind them. All
//! submissions live in the spreadsheet; the only state kept here is the
//! joined dashboard data of open visits, in memory.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use wikara_common::reference::ReferenceSource;
use wikara_common::sheets::SheetStore;
use visits::DashboardVisits;

pub mod api;
pub mod error;
pub mod visits;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Submission spreadsheet (export reads and appends)
    pub store: Arc<dyn SheetStore>,
    /// Reference hierarchy, re-read on every dashboard visit
    pub reference: Arc<dyn ReferenceSource>,
    /// Respondent-name options, loaded once at startup
    pub names: Arc<Vec<String>>,
    /// Joined dashboard data per open visit
    pub visits: Arc<DashboardVisits>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SheetStore>,
        reference: Arc<dyn ReferenceSource>,
        names: Vec<String>,
    ) -> Self {
        Self {
            store,
            reference,
            names: Arc::new(names),
            visits: Arc::new(DashboardVisits::new()),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/form", get(api::serve_form))
        .route("/dashboard", get(api::serve_dashboard))
        .route("/static/form.js", get(api::serve_form_js))
        .route("/static/dashboard.js", get(api::serve_dashboard_js))
        .route("/static/wikara.css", get(api::serve_css));

    let api = Router::new()
        .route("/api/reference", get(api::get_reference))
        .route("/api/names", get(api::get_names))
        .route("/api/submit", post(api::submit))
        .route("/api/dashboard/visits", post(api::open_visit))
        .route("/api/dashboard/visits/:visit", get(api::view_visit))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(pages)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
