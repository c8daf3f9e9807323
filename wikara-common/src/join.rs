//! Join engine: overlay submitted rows onto the reference hierarchy
//!
//! The joined hierarchy always has exactly the reference hierarchy's shape.
//! Export rows can only annotate sub-units; rows whose key matches no
//! sub-unit are ignored.
//!
//! When several export rows normalize to the same key, the last one in
//! export order wins. Such keys are collected in
//! [`JoinedHierarchy::duplicate_ids`] so callers can report them.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::export::{ExportColumns, SubmissionExport, SubmittedRow};
use crate::hierarchy::Region;
use crate::normalize::{normalize_id, RawCell};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedSubUnit {
    pub id: String,
    pub name: String,
    pub submission: Option<SubmittedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedSubRegion {
    pub id: String,
    pub name: String,
    pub sub_units: Vec<JoinedSubUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRegion {
    pub id: String,
    pub name: String,
    pub sub_regions: Vec<JoinedSubRegion>,
}

/// Reference hierarchy annotated with matched submissions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedHierarchy {
    pub regions: Vec<JoinedRegion>,
    /// Column positions used to read fields out of submitted rows
    pub columns: ExportColumns,
    /// Normalized keys that appeared more than once in the export
    pub duplicate_ids: Vec<String>,
}

impl JoinedSubRegion {
    /// (matched, total) sub-unit counts
    pub fn completion(&self) -> (usize, usize) {
        let matched = self
            .sub_units
            .iter()
            .filter(|s| s.submission.is_some())
            .count();
        (matched, self.sub_units.len())
    }
}

impl JoinedRegion {
    /// (matched, total) sub-unit counts across all sub-regions
    pub fn completion(&self) -> (usize, usize) {
        self.sub_regions
            .iter()
            .map(JoinedSubRegion::completion)
            .fold((0, 0), |(m, t), (dm, dt)| (m + dm, t + dt))
    }
}

impl JoinedHierarchy {
    /// Hierarchy with no regions, used when nothing could be loaded
    pub fn empty() -> Self {
        Self {
            regions: Vec::new(),
            columns: ExportColumns::default(),
            duplicate_ids: Vec::new(),
        }
    }

    pub fn sub_unit_count(&self) -> usize {
        self.regions.iter().map(|r| r.completion().1).sum()
    }

    pub fn matched_count(&self) -> usize {
        self.regions.iter().map(|r| r.completion().0).sum()
    }
}

/// Index export records by normalized sub-unit key
///
/// Returns the lookup plus the keys seen more than once, in the order their
/// first repeat was encountered.
pub fn build_lookup(
    records: &[Vec<Value>],
    columns: &ExportColumns,
) -> (HashMap<String, SubmittedRow>, Vec<String>) {
    let mut lookup = HashMap::with_capacity(records.len());
    let mut duplicates = Vec::new();

    for record in records {
        let raw = record
            .get(columns.sub_unit_id)
            .map(RawCell::from)
            .unwrap_or(RawCell::Missing);
        let key = normalize_id(raw);

        if lookup
            .insert(key.clone(), SubmittedRow::from_cells(record))
            .is_some()
            && !duplicates.contains(&key)
        {
            duplicates.push(key);
        }
    }

    (lookup, duplicates)
}

/// Join the export onto the reference hierarchy
pub fn join(reference: &[Region], export: &SubmissionExport) -> JoinedHierarchy {
    let columns = ExportColumns::for_export(export);
    let (lookup, duplicate_ids) = build_lookup(export.records(), &columns);

    let regions = reference
        .iter()
        .map(|region| JoinedRegion {
            id: region.id.clone(),
            name: region.name.clone(),
            sub_regions: region
                .sub_regions
                .iter()
                .map(|sub_region| JoinedSubRegion {
                    id: sub_region.id.clone(),
                    name: sub_region.name.clone(),
                    sub_units: sub_region
                        .sub_units
                        .iter()
                        .map(|sub_unit| JoinedSubUnit {
                            id: sub_unit.id.clone(),
                            name: sub_unit.name.clone(),
                            submission: lookup.get(&sub_unit.id).cloned(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    JoinedHierarchy {
        regions,
        columns,
        duplicate_ids,
    }
}
