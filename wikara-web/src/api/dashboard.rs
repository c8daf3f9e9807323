//! Dashboard data endpoints
//!
//! `POST /api/dashboard/visits` starts a visit: both sources are fetched
//! and joined once, and the result is held in memory for the session.
//! Filter and page changes go to `GET /api/dashboard/visits/:visit` and
//! only recompute the view. A failed load is still a 200 with
//! `status: "unavailable"` and empty data.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wikara_common::aggregate::selected_region;
use wikara_common::dashboard::{load_joined, DashboardState, DashboardView};

use crate::visits::VisitId;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Region id; empty or absent means all regions
    pub region: Option<String>,
    /// 1-based page, clamped to the available range
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub visit: VisitId,
    pub view: DashboardView,
}

/// POST /api/dashboard/visits
pub async fn open_visit(State(state): State<AppState>) -> Json<VisitResponse> {
    let mut dashboard = DashboardState::new();
    dashboard.finish_load(load_joined(state.store.as_ref(), state.reference.as_ref()).await);
    let view = dashboard.view();

    let visit = state.visits.open(dashboard).await;
    debug!(visit, status = ?view.status, "Dashboard visit opened");
    Json(VisitResponse { visit, view })
}

/// GET /api/dashboard/visits/:visit?region=&page=
///
/// A region different from the current one resets to the first page and
/// ignores `page`.
pub async fn view_visit(
    State(state): State<AppState>,
    Path(visit): Path<VisitId>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<VisitResponse>> {
    let view = state
        .visits
        .update(visit, |dashboard| {
            let region = selected_region(query.region.as_deref());
            if region != dashboard.selected_region() {
                dashboard.select_region(region);
            } else if let Some(page) = query.page {
                dashboard.go_to_page(page);
            }
        })
        .await
        .ok_or_else(|| ApiError::NotFound(format!("dashboard visit {}", visit)))?;

    debug!(
        visit,
        region = ?view.selected_region,
        page = view.page,
        total_pages = view.total_pages,
        "Dashboard view computed"
    );
    Ok(Json(VisitResponse { visit, view }))
}
