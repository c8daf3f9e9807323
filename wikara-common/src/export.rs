//! Submission export: the flat, row-per-submission view of the main sheet
//!
//! The export endpoint answers `{ "data": [[...], ...] }` where the first row
//! is the sheet header. Cells are usually strings, but the spreadsheet may
//! hand back numbers for numeric-looking columns, so cells are kept as raw
//! JSON values until they are read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown for any field a sub-unit has no value for
pub const PLACEHOLDER: &str = "-";

/// Raw export as returned by the export endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SubmissionExport {
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl SubmissionExport {
    /// Header row, if the export has one
    pub fn header(&self) -> Option<Vec<String>> {
        self.data
            .first()
            .map(|row| row.iter().map(cell_text).collect())
    }

    /// Data rows (everything after the header)
    pub fn records(&self) -> &[Vec<Value>] {
        self.data.get(1..).unwrap_or(&[])
    }
}

/// One submitted row, with every cell rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedRow {
    pub cells: Vec<String>,
}

impl SubmittedRow {
    pub fn from_cells(cells: &[Value]) -> Self {
        Self {
            cells: cells.iter().map(cell_text).collect(),
        }
    }

    /// Non-empty text at `index`
    pub fn field(&self, index: usize) -> Option<&str> {
        self.cells
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Render a raw cell as display text
///
/// Whole numbers render without a fractional part so that a count typed as
/// a number in the sheet shows as `3`, not `3.0`.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.is_finite() => format!("{:.0}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Column positions of the fields the dashboard reads, resolved by header name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportColumns {
    pub sub_unit_id: usize,
    pub timestamp: usize,
    pub respondent: usize,
    pub sub_unit_count: usize,
}

const ID_HEADERS: &[&str] = &["idsls", "id", "idsubunit"];
const TIMESTAMP_HEADERS: &[&str] = &["timestamp", "waktu", "submittedat"];
const RESPONDENT_HEADERS: &[&str] = &["nama", "name", "respondent", "respondentname"];
const COUNT_HEADERS: &[&str] = &["jumlahsubsls", "subunitcount"];

impl Default for ExportColumns {
    /// Column order written by the submission form
    fn default() -> Self {
        Self {
            sub_unit_id: 0,
            timestamp: 1,
            respondent: 2,
            sub_unit_count: 6,
        }
    }
}

impl ExportColumns {
    /// Derive column positions from a header row
    ///
    /// Each field keeps its default position when no header matches it.
    pub fn from_header(header: &[String]) -> Self {
        let keys: Vec<String> = header.iter().map(|h| header_key(h)).collect();
        let find = |aliases: &[&str], fallback: usize| {
            keys.iter()
                .position(|k| aliases.contains(&k.as_str()))
                .unwrap_or(fallback)
        };

        let defaults = Self::default();
        Self {
            sub_unit_id: find(ID_HEADERS, defaults.sub_unit_id),
            timestamp: find(TIMESTAMP_HEADERS, defaults.timestamp),
            respondent: find(RESPONDENT_HEADERS, defaults.respondent),
            sub_unit_count: find(COUNT_HEADERS, defaults.sub_unit_count),
        }
    }

    pub fn for_export(export: &SubmissionExport) -> Self {
        export
            .header()
            .map(|h| Self::from_header(&h))
            .unwrap_or_default()
    }
}

/// Lowercase alphanumerics only: "ID SLS" and "id_sls" both become "idsls"
fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
