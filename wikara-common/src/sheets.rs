//! Spreadsheet-backed store
//!
//! Reads go to the export endpoint (`{ "data": [[...]] }`); writes go to the
//! apps-script web app, which appends one main row and N detail rows and
//! answers `{ "success": bool, "message": string }`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::export::SubmissionExport;
use crate::{Error, Result};

/// Base URL of deployed apps-script web apps
const APPS_SCRIPT_BASE: &str = "https://script.google.com/macros/s";

/// Append endpoint for an apps-script deployment id
pub fn apps_script_url(script_id: &str) -> String {
    format!("{}/{}/exec", APPS_SCRIPT_BASE, script_id)
}

/// Rows appended by one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendPayload {
    #[serde(rename = "mainData")]
    pub main_row: Vec<String>,
    #[serde(rename = "subSLSData")]
    pub detail_rows: Vec<Vec<String>>,
}

/// Reply from the append endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Read/append access to the submission spreadsheet
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Current export of all submitted rows, header first
    async fn fetch_export(&self) -> Result<SubmissionExport>;

    /// Append one submission
    ///
    /// `Ok` means the endpoint answered; check [`WriteOutcome::success`]
    /// for whether it accepted the rows.
    async fn append(&self, payload: &AppendPayload) -> Result<WriteOutcome>;
}

/// HTTP client for the export and apps-script endpoints
pub struct HttpSheetStore {
    client: Client,
    export_url: Option<String>,
    append_url: Option<String>,
}

impl HttpSheetStore {
    pub fn new(client: Client, export_url: Option<String>, append_url: Option<String>) -> Self {
        Self {
            client,
            export_url,
            append_url,
        }
    }
}

#[async_trait]
impl SheetStore for HttpSheetStore {
    async fn fetch_export(&self) -> Result<SubmissionExport> {
        let url = self
            .export_url
            .as_deref()
            .ok_or_else(|| Error::Config("sheet export URL (WIKARA_SHEET_URL) not configured".to_string()))?;

        debug!(url = %url, "Fetching submission export");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "submission export returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn append(&self, payload: &AppendPayload) -> Result<WriteOutcome> {
        let url = self.append_url.as_deref().ok_or_else(|| {
            Error::Config("apps script id (WIKARA_APPS_SCRIPT_ID) not configured".to_string())
        })?;

        debug!(
            sub_unit_id = payload.main_row.first().map(String::as_str).unwrap_or(""),
            detail_rows = payload.detail_rows.len(),
            "Appending submission"
        );
        let response = self.client.post(url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "append endpoint returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
