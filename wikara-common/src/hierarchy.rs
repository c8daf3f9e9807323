//! Reference hierarchy types
//!
//! The reference hierarchy is the authoritative universe of reportable
//! sub-units: regions (kecamatan) contain sub-regions (desa), which contain
//! sub-units (SLS). It is loaded as static JSON and never mutated.
//!
//! JSON shape (keys follow the published reference file):
//!
//! ```json
//! [{ "id": "010", "name": "Selemadeg",
//!    "desa": [{ "id": "001", "name": "Antap",
//!               "sls": [{ "id": "51020100010001", "name": "Banjar Antap" }] }] }]
//! ```

use serde::{Deserialize, Serialize};

/// Top level of the hierarchy (kecamatan)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(rename = "desa", default)]
    pub sub_regions: Vec<SubRegion>,
}

/// Second level of the hierarchy (desa)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRegion {
    pub id: String,
    pub name: String,
    #[serde(rename = "sls", default)]
    pub sub_units: Vec<SubUnit>,
}

/// Leaf of the hierarchy (SLS)
///
/// `id` is expected to already be the canonical 14-digit key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubUnit {
    pub id: String,
    pub name: String,
}

impl Region {
    /// Total number of sub-units across all sub-regions
    pub fn sub_unit_count(&self) -> usize {
        self.sub_regions.iter().map(|d| d.sub_units.len()).sum()
    }
}

/// Count every sub-unit in the hierarchy
pub fn count_sub_units(regions: &[Region]) -> usize {
    regions.iter().map(Region::sub_unit_count).sum()
}

/// Resolve a region / sub-region / sub-unit id triple to its sub-unit
///
/// Returns `None` if any level does not exist or the levels do not nest.
pub fn find_sub_unit<'a>(
    regions: &'a [Region],
    region_id: &str,
    sub_region_id: &str,
    sub_unit_id: &str,
) -> Option<&'a SubUnit> {
    regions
        .iter()
        .find(|r| r.id == region_id)?
        .sub_regions
        .iter()
        .find(|d| d.id == sub_region_id)?
        .sub_units
        .iter()
        .find(|s| s.id == sub_unit_id)
}
