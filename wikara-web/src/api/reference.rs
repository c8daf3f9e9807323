//! Reference hierarchy and respondent-name options
//!
//! The form uses these to fill its cascading selects and the name picker.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use wikara_common::hierarchy::Region;
use wikara_common::names::filter_names;

use crate::{ApiResult, AppState};

/// GET /api/reference
pub async fn get_reference(State(state): State<AppState>) -> ApiResult<Json<Vec<Region>>> {
    let regions = state.reference.load().await?;
    Ok(Json(regions))
}

#[derive(Debug, Deserialize)]
pub struct NamesQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/names?q=
pub async fn get_names(
    State(state): State<AppState>,
    Query(query): Query<NamesQuery>,
) -> Json<Vec<String>> {
    let names = filter_names(&state.names, &query.q)
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(names)
}
