//! Submission endpoint
//!
//! Validates the form against the reference hierarchy, stamps it, and
//! appends it to the spreadsheet. The reply always has the
//! `{ success, message }` shape the form shows as a notification.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use wikara_common::submission::{Submission, FAILURE_MESSAGE, SUCCESS_MESSAGE};
use wikara_common::time::{format_submission_timestamp, now};

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

impl SubmitResponse {
    fn ok() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// POST /api/submit
pub async fn submit(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> (StatusCode, Json<SubmitResponse>) {
    let regions = match state.reference.load().await {
        Ok(regions) => regions,
        Err(e) => {
            error!(
                location = %state.reference.location(),
                "Failed to load reference hierarchy for submission: {}", e
            );
            return (StatusCode::BAD_GATEWAY, Json(SubmitResponse::failed(FAILURE_MESSAGE)));
        }
    };

    let submission = match submission.prepare(&regions) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Rejected submission: {}", e);
            return (StatusCode::BAD_REQUEST, Json(SubmitResponse::failed(e.to_string())));
        }
    };

    let timestamp = format_submission_timestamp(&now());
    let payload = submission.to_payload(&timestamp);

    match state.store.append(&payload).await {
        Ok(outcome) if outcome.success => {
            info!(
                sub_unit_id = %submission.form.sub_unit_id,
                entries = submission.entries.len(),
                "Submission saved"
            );
            (StatusCode::OK, Json(SubmitResponse::ok()))
        }
        Ok(outcome) => {
            error!(
                sub_unit_id = %submission.form.sub_unit_id,
                "Sheet rejected submission: {}", outcome.message
            );
            let message = if outcome.message.trim().is_empty() {
                FAILURE_MESSAGE.to_string()
            } else {
                outcome.message
            };
            (StatusCode::BAD_GATEWAY, Json(SubmitResponse::failed(message)))
        }
        Err(e) => {
            error!(
                sub_unit_id = %submission.form.sub_unit_id,
                "Failed to append submission: {}", e
            );
            (StatusCode::BAD_GATEWAY, Json(SubmitResponse::failed(FAILURE_MESSAGE)))
        }
    }
}
