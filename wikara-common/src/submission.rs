//! Survey submission: form model, validation and sheet rows
//!
//! One submission describes a single sub-unit (SLS) and the sub-sub-units
//! ("Sub SLS") found inside it. It becomes one main row plus one detail row
//! per entry in the spreadsheet.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hierarchy::{find_sub_unit, Region};
use crate::sheets::AppendPayload;

/// Message returned when the sheet accepted the rows
pub const SUCCESS_MESSAGE: &str = "Data berhasil disimpan ke Google Sheets!";

/// Message returned for any failed write
pub const FAILURE_MESSAGE: &str = "Gagal menyimpan data. Silakan coba lagi.";

/// Detail ids carry a two-digit sequence number
pub const MAX_ENTRIES: usize = 99;

/// A yes/no answer that may not have been given yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "ya")]
    Yes,
    #[serde(rename = "tidak")]
    No,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Unset => "",
            Choice::Yes => "ya",
            Choice::No => "tidak",
        }
    }
}

/// Top-level form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub respondent_name: String,
    /// Region id
    pub region: String,
    /// Sub-region id
    pub sub_region: String,
    /// Selected sub-unit id
    pub sub_unit: String,
    /// Canonical sub-unit id; derived from the hierarchy on the server
    pub sub_unit_id: String,
    /// Declared number of Sub SLS entries, as typed
    pub sub_unit_count: String,
}

/// Survey answers for one Sub SLS
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubUnitEntry {
    pub business_load_count: String,
    pub household_count: String,
    pub has_market: Choice,
    pub market_name: String,
    pub market_load_count: String,
    pub has_housing: Choice,
    pub housing_count: String,
    pub housing_name: String,
    pub building_count: String,
}

/// A complete form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub form: FormData,
    #[serde(default)]
    pub entries: Vec<SubUnitEntry>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("at most 99 Sub SLS entries are supported, got {0}")]
    TooManyEntries(usize),

    #[error("Sub SLS {number}: {reason}")]
    IncompleteEntry { number: usize, reason: &'static str },

    #[error("selected region, sub-region and sub-unit do not exist in the reference hierarchy")]
    UnknownPlacement,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl SubUnitEntry {
    /// Drop answers that only apply when the parent question is "ya"
    pub fn clear_unused(&mut self) {
        if self.has_market == Choice::No {
            self.market_name.clear();
            self.market_load_count.clear();
        }
        if self.has_housing == Choice::No {
            self.housing_count.clear();
            self.housing_name.clear();
            self.building_count.clear();
        }
    }

    /// Check the entry is complete
    pub fn check(&self) -> Result<(), &'static str> {
        if blank(&self.business_load_count) {
            return Err("business-load count is required");
        }
        if blank(&self.household_count) {
            return Err("household count is required");
        }
        if self.has_market == Choice::Unset {
            return Err("market answer is required");
        }
        if self.has_housing == Choice::Unset {
            return Err("housing answer is required");
        }
        if self.has_market == Choice::Yes && blank(&self.market_name) && blank(&self.market_load_count) {
            return Err("market name or market-load count is required");
        }
        if self.has_housing == Choice::Yes
            && (blank(&self.housing_count) || blank(&self.housing_name) || blank(&self.building_count))
        {
            return Err("housing count, housing name and building count are required");
        }
        Ok(())
    }

    fn survey_cells(&self) -> [String; 9] {
        [
            self.business_load_count.clone(),
            self.household_count.clone(),
            self.has_market.as_str().to_string(),
            self.market_name.clone(),
            self.market_load_count.clone(),
            self.has_housing.as_str().to_string(),
            self.housing_count.clone(),
            self.housing_name.clone(),
            self.building_count.clone(),
        ]
    }
}

/// Id of the `index`-th (0-based) detail row out of `total`
///
/// # Examples
/// ```
/// use wikara_common::submission::generate_sub_unit_id;
///
/// assert_eq!(generate_sub_unit_id("51010101001001", 0, 1), "5101010100100100");
/// assert_eq!(generate_sub_unit_id("51010101001001", 2, 3), "5101010100100103");
/// ```
pub fn generate_sub_unit_id(base: &str, index: usize, total: usize) -> String {
    if total == 1 {
        format!("{}00", base)
    } else {
        format!("{}{:02}", base, index + 1)
    }
}

/// Leading integer of a typed count; anything unparsable or negative is 0
fn parse_count(raw: &str) -> usize {
    let digits: String = raw.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

impl Submission {
    /// Number of entries implied by the typed sub-unit count
    pub fn declared_count(&self) -> usize {
        parse_count(&self.form.sub_unit_count)
    }

    /// Match the entry list to the declared count
    ///
    /// Existing entries are kept in place; new ones start empty.
    pub fn resize_entries(&mut self) {
        let count = self.declared_count();
        self.entries.resize_with(count, SubUnitEntry::default);
    }

    /// Check the whole submission is complete
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("respondent name", &self.form.respondent_name),
            ("region", &self.form.region),
            ("sub-region", &self.form.sub_region),
            ("sub-unit", &self.form.sub_unit),
            ("sub-unit count", &self.form.sub_unit_count),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| blank(value)) {
            return Err(ValidationError::MissingField(*name));
        }

        for (index, entry) in self.entries.iter().enumerate() {
            entry
                .check()
                .map_err(|reason| ValidationError::IncompleteEntry {
                    number: index + 1,
                    reason,
                })?;
        }

        Ok(())
    }

    /// Normalize, validate and resolve against the hierarchy
    ///
    /// On success the submission is ready for [`Submission::to_payload`].
    pub fn prepare(mut self, regions: &[Region]) -> Result<Self, ValidationError> {
        let count = self.declared_count();
        if count > MAX_ENTRIES {
            return Err(ValidationError::TooManyEntries(count));
        }

        self.resize_entries();
        self.entries.iter_mut().for_each(SubUnitEntry::clear_unused);
        self.validate()?;

        let sub_unit = find_sub_unit(
            regions,
            self.form.region.trim(),
            self.form.sub_region.trim(),
            self.form.sub_unit.trim(),
        )
        .ok_or(ValidationError::UnknownPlacement)?;
        self.form.sub_unit_id = sub_unit.id.clone();

        Ok(self)
    }

    /// Sheet rows for this submission
    pub fn to_payload(&self, timestamp: &str) -> AppendPayload {
        let form = &self.form;
        let id = form.sub_unit_id.as_str();
        let total = self.entries.len();

        let main_row = vec![
            id.to_string(),
            timestamp.to_string(),
            form.respondent_name.clone(),
            form.region.clone(),
            form.sub_region.clone(),
            form.sub_unit.clone(),
            form.sub_unit_count.clone(),
        ];

        let detail_rows = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut row = vec![
                    id.to_string(),
                    // Leading quote keeps the sheet from reading the id as a number
                    format!("'{}", generate_sub_unit_id(id, index, total)),
                    timestamp.to_string(),
                    form.respondent_name.clone(),
                    format!("Sub SLS - {}", index + 1),
                ];
                row.extend(entry.survey_cells());
                row
            })
            .collect();

        AppendPayload {
            main_row,
            detail_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn regions() -> Vec<Region> {
        serde_json::from_value(json!([
            {"id": "010", "name": "Selemadeg", "desa": [
                {"id": "001", "name": "Antap", "sls": [
                    {"id": "51010101001001", "name": "Banjar Antap"}
                ]}
            ]}
        ]))
        .unwrap()
    }

    fn complete_entry() -> SubUnitEntry {
        SubUnitEntry {
            business_load_count: "4".to_string(),
            household_count: "12".to_string(),
            has_market: Choice::No,
            has_housing: Choice::Yes,
            housing_count: "1".to_string(),
            housing_name: "Griya Asri".to_string(),
            building_count: "30".to_string(),
            ..Default::default()
        }
    }

    fn submission(count: &str, entries: Vec<SubUnitEntry>) -> Submission {
        Submission {
            form: FormData {
                respondent_name: "Ni Made Ayu".to_string(),
                region: "010".to_string(),
                sub_region: "001".to_string(),
                sub_unit: "51010101001001".to_string(),
                sub_unit_id: String::new(),
                sub_unit_count: count.to_string(),
            },
            entries,
        }
    }

    #[test]
    fn test_single_entry_id_uses_00_suffix() {
        assert_eq!(generate_sub_unit_id("51010101001001", 0, 1), "5101010100100100");
    }

    #[test]
    fn test_multiple_entry_ids_are_sequenced() {
        let ids: Vec<String> = (0..3).map(|i| generate_sub_unit_id("51010101001001", i, 3)).collect();
        assert_eq!(
            ids,
            vec!["5101010100100101", "5101010100100102", "5101010100100103"]
        );
    }

    #[test]
    fn test_choice_wire_values() {
        let entry: SubUnitEntry =
            serde_json::from_value(json!({"hasMarket": "ya", "hasHousing": ""})).unwrap();
        assert_eq!(entry.has_market, Choice::Yes);
        assert_eq!(entry.has_housing, Choice::Unset);
        assert_eq!(serde_json::to_value(Choice::No).unwrap(), json!("tidak"));
    }

    #[test]
    fn test_declared_count_parsing() {
        assert_eq!(submission("3", vec![]).declared_count(), 3);
        assert_eq!(submission(" 2 ", vec![]).declared_count(), 2);
        assert_eq!(submission("2 sub", vec![]).declared_count(), 2);
        assert_eq!(submission("-1", vec![]).declared_count(), 0);
        assert_eq!(submission("abc", vec![]).declared_count(), 0);
    }

    #[test]
    fn test_resize_preserves_existing_entries() {
        let mut s = submission("3", vec![complete_entry()]);
        s.resize_entries();
        assert_eq!(s.entries.len(), 3);
        assert_eq!(s.entries[0], complete_entry());
        assert_eq!(s.entries[2], SubUnitEntry::default());

        s.form.sub_unit_count = "1".to_string();
        s.resize_entries();
        assert_eq!(s.entries, vec![complete_entry()]);

        s.form.sub_unit_count = "0".to_string();
        s.resize_entries();
        assert!(s.entries.is_empty());
    }

    #[test]
    fn test_clear_unused_on_no() {
        let mut entry = SubUnitEntry {
            has_market: Choice::No,
            market_name: "Pasar Kediri".to_string(),
            market_load_count: "10".to_string(),
            has_housing: Choice::No,
            housing_count: "1".to_string(),
            housing_name: "Griya".to_string(),
            building_count: "5".to_string(),
            ..Default::default()
        };
        entry.clear_unused();

        assert!(entry.market_name.is_empty());
        assert!(entry.market_load_count.is_empty());
        assert!(entry.housing_count.is_empty());
        assert!(entry.housing_name.is_empty());
        assert!(entry.building_count.is_empty());
    }

    #[test]
    fn test_validate_missing_top_level_field() {
        let mut s = submission("1", vec![complete_entry()]);
        s.form.respondent_name = "  ".to_string();
        assert_eq!(s.validate(), Err(ValidationError::MissingField("respondent name")));
    }

    #[test]
    fn test_validate_market_needs_name_or_count() {
        let mut entry = complete_entry();
        entry.has_market = Choice::Yes;
        let s = submission("1", vec![entry.clone()]);
        assert!(matches!(
            s.validate(),
            Err(ValidationError::IncompleteEntry { number: 1, .. })
        ));

        entry.market_load_count = "7".to_string();
        assert_eq!(submission("1", vec![entry]).validate(), Ok(()));
    }

    #[test]
    fn test_validate_housing_needs_all_three() {
        let mut entry = complete_entry();
        entry.building_count.clear();
        let s = submission("2", vec![complete_entry(), entry]);
        assert!(matches!(
            s.validate(),
            Err(ValidationError::IncompleteEntry { number: 2, .. })
        ));
    }

    #[test]
    fn test_prepare_pads_and_then_rejects_empty_entries() {
        let result = submission("2", vec![complete_entry()]).prepare(&regions());
        assert!(matches!(
            result,
            Err(ValidationError::IncompleteEntry { number: 2, .. })
        ));
    }

    #[test]
    fn test_prepare_rejects_unknown_placement() {
        let mut s = submission("1", vec![complete_entry()]);
        s.form.sub_region = "999".to_string();
        assert_eq!(s.prepare(&regions()), Err(ValidationError::UnknownPlacement));
    }

    #[test]
    fn test_prepare_rejects_too_many_entries() {
        let s = submission("100", vec![]);
        assert_eq!(s.prepare(&regions()), Err(ValidationError::TooManyEntries(100)));
    }

    #[test]
    fn test_prepare_derives_sub_unit_id() {
        let mut s = submission("1", vec![complete_entry()]);
        s.form.sub_unit_id = "tampered".to_string();
        let prepared = s.prepare(&regions()).unwrap();
        assert_eq!(prepared.form.sub_unit_id, "51010101001001");
    }

    #[test]
    fn test_payload_rows() {
        let prepared = submission("1", vec![complete_entry()]).prepare(&regions()).unwrap();
        let payload = prepared.to_payload("1/8/2025, 09.05.07");

        assert_eq!(
            payload.main_row,
            vec![
                "51010101001001",
                "1/8/2025, 09.05.07",
                "Ni Made Ayu",
                "010",
                "001",
                "51010101001001",
                "1"
            ]
        );

        assert_eq!(payload.detail_rows.len(), 1);
        let detail = &payload.detail_rows[0];
        assert_eq!(detail.len(), 14);
        assert_eq!(detail[0], "51010101001001");
        assert_eq!(detail[1], "'5101010100100100");
        assert_eq!(detail[4], "Sub SLS - 1");
        assert_eq!(detail[5], "4");
        assert_eq!(detail[7], "tidak");
        assert_eq!(detail[10], "ya");
        assert_eq!(detail[12], "Griya Asri");
    }

    #[test]
    fn test_payload_third_of_three_entries() {
        let prepared = submission("3", vec![complete_entry(); 3]).prepare(&regions()).unwrap();
        let payload = prepared.to_payload("t");

        assert_eq!(payload.detail_rows[2][1], "'5101010100100103");
        assert_eq!(payload.detail_rows[2][4], "Sub SLS - 3");
    }
}
