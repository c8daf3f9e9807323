//! Completion aggregation and table flattening for the dashboard

use std::cmp::Ordering;

use serde::Serialize;

use crate::export::PLACEHOLDER;
use crate::join::{JoinedHierarchy, JoinedRegion};

/// What one chart bar stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// No region selected: one bar per region
    Region,
    /// A region selected: one bar per sub-region inside it
    SubRegion,
}

/// One bar of the completion chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub name: String,
    pub percentage: f64,
    pub matched: usize,
    pub total: usize,
}

/// One row of the sub-unit table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub region: String,
    pub sub_region: String,
    pub sub_unit_id: String,
    pub sub_unit_name: String,
    pub sub_unit_count: String,
    pub respondent: String,
    pub timestamp: String,
}

/// Treat an empty selection as "all regions"
pub fn selected_region(region: Option<&str>) -> Option<&str> {
    region.map(str::trim).filter(|r| !r.is_empty())
}

/// Regions visible under the filter
///
/// An unknown region id yields nothing.
pub fn filter_regions<'a>(
    joined: &'a JoinedHierarchy,
    region: Option<&str>,
) -> Vec<&'a JoinedRegion> {
    match selected_region(region) {
        Some(id) => joined.regions.iter().filter(|r| r.id == id).collect(),
        None => joined.regions.iter().collect(),
    }
}

/// Percentage of matched sub-units, rounded to one decimal
///
/// # Examples
/// ```
/// use wikara_common::aggregate::completion_percentage;
///
/// assert_eq!(completion_percentage(3, 4), 75.0);
/// assert_eq!(completion_percentage(1, 3), 33.3);
/// assert_eq!(completion_percentage(0, 0), 0.0);
/// ```
pub fn completion_percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percentage = 100.0 * matched as f64 / total as f64;
    (percentage * 10.0).round() / 10.0
}

fn entry(name: &str, (matched, total): (usize, usize)) -> ChartEntry {
    ChartEntry {
        name: name.to_string(),
        percentage: completion_percentage(matched, total),
        matched,
        total,
    }
}

/// Completion chart series, highest percentage first
///
/// Equal percentages keep hierarchy order.
pub fn chart_series(joined: &JoinedHierarchy, region: Option<&str>) -> (Grouping, Vec<ChartEntry>) {
    let (grouping, mut entries) = match selected_region(region) {
        Some(_) => (
            Grouping::SubRegion,
            filter_regions(joined, region)
                .first()
                .map(|r| {
                    r.sub_regions
                        .iter()
                        .map(|d| entry(&d.name, d.completion()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        ),
        None => (
            Grouping::Region,
            joined
                .regions
                .iter()
                .map(|r| entry(&r.name, r.completion()))
                .collect::<Vec<_>>(),
        ),
    };

    // sort_by is stable
    entries.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
    });

    (grouping, entries)
}

/// Flatten the filtered hierarchy into one row per sub-unit
pub fn table_rows(joined: &JoinedHierarchy, region: Option<&str>) -> Vec<TableRow> {
    let columns = joined.columns;
    let mut rows = Vec::new();

    for r in filter_regions(joined, region) {
        for d in &r.sub_regions {
            for s in &d.sub_units {
                let field = |index: usize| {
                    s.submission
                        .as_ref()
                        .and_then(|row| row.field(index))
                        .unwrap_or(PLACEHOLDER)
                        .to_string()
                };

                rows.push(TableRow {
                    region: r.name.clone(),
                    sub_region: d.name.clone(),
                    sub_unit_id: s.id.clone(),
                    sub_unit_name: s.name.clone(),
                    sub_unit_count: field(columns.sub_unit_count),
                    respondent: field(columns.respondent),
                    timestamp: field(columns.timestamp),
                });
            }
        }
    }

    rows
}
