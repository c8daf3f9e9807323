//! Respondent-name options for the form's searchable name picker

use std::path::Path;

use tracing::debug;

use crate::Result;

/// Read the name list (a JSON array of strings)
pub async fn load_names(path: &Path) -> Result<Vec<String>> {
    debug!(path = %path.display(), "Reading name options");
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Names containing `query`, ignoring case, in list order
///
/// A blank query matches everything.
pub fn filter_names<'a>(names: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}
