//! Sub-unit identifier normalization
//!
//! Export cells holding sub-unit ids arrive in whatever form the spreadsheet
//! produced: numbers, zero-stripped strings, strings with a leading quote,
//! or nothing at all. Every form is folded into one canonical key: exactly
//! [`KEY_WIDTH`] ASCII digits, left-padded with zeros.
//!
//! Malformed input never fails; it produces a key that simply matches no
//! sub-unit.

use serde_json::Value;

/// Width of a canonical sub-unit key
pub const KEY_WIDTH: usize = 14;

/// A raw export cell as delivered by the spreadsheet export
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Missing,
}

impl From<&Value> for RawCell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawCell::Missing,
            Value::Number(n) => n.as_f64().map(RawCell::Number).unwrap_or(RawCell::Missing),
            Value::String(s) => RawCell::Text(s.clone()),
            other => RawCell::Text(other.to_string()),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<i64> for RawCell {
    fn from(value: i64) -> Self {
        RawCell::Number(value as f64)
    }
}

/// Normalize a raw cell into a canonical sub-unit key
///
/// # Examples
/// ```
/// use wikara_common::normalize::normalize_id;
///
/// assert_eq!(normalize_id("123"), "00000000000123");
/// assert_eq!(normalize_id(123i64), "00000000000123");
/// assert_eq!(normalize_id("'5101-0101-0010-01"), "51010101001001");
/// ```
pub fn normalize_id(raw: impl Into<RawCell>) -> String {
    let raw = raw.into();

    let digits: String = match numeric_value(&raw) {
        // Zero decimal places; sign is not part of a key
        Some(n) => format!("{:.0}", n.round())
            .chars()
            .filter(char::is_ascii_digit)
            .collect(),
        None => match &raw {
            RawCell::Text(s) => s.chars().filter(char::is_ascii_digit).collect(),
            RawCell::Number(_) | RawCell::Missing => String::new(),
        },
    };

    pad_key(&digits)
}

/// Interpret a cell as a finite number, if it is one
fn numeric_value(raw: &RawCell) -> Option<f64> {
    match raw {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        RawCell::Missing => None,
    }
    .filter(|n| n.is_finite())
}

/// Left-pad with zeros to the key width; overlong input keeps its leading digits
fn pad_key(digits: &str) -> String {
    if digits.len() >= KEY_WIDTH {
        digits[..KEY_WIDTH].to_string()
    } else {
        format!("{:0>width$}", digits, width = KEY_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_canonical(key: &str) {
        assert_eq!(key.len(), KEY_WIDTH, "key {:?} has wrong width", key);
        assert!(key.chars().all(|c| c.is_ascii_digit()), "key {:?} has non-digits", key);
    }

    #[test]
    fn test_same_value_in_different_forms_matches() {
        let expected = "00000000000123";
        assert_eq!(normalize_id("123"), expected);
        assert_eq!(normalize_id("0000000000123"), expected);
        assert_eq!(normalize_id(123i64), expected);
        assert_eq!(normalize_id(123.0), expected);
        assert_eq!(normalize_id(" 123 "), expected);
        assert_eq!(normalize_id(&json!(123)), expected);
        assert_eq!(normalize_id(&json!("123")), expected);
    }

    #[test]
    fn test_full_width_id_unchanged() {
        assert_eq!(normalize_id("51010101001001"), "51010101001001");
        assert_eq!(normalize_id(51010101001001i64), "51010101001001");
    }

    #[test]
    fn test_leading_zero_restored_for_numeric_export() {
        // Sheets drop the leading zero when a cell is typed as a number
        assert_eq!(normalize_id(1020100010001i64), "01020100010001");
    }

    #[test]
    fn test_non_numeric_text_is_stripped_to_digits() {
        assert_eq!(normalize_id("'51010101001001"), "51010101001001");
        assert_eq!(normalize_id("ID: 5101 0101 0010 01"), "51010101001001");
        assert_eq!(normalize_id("abc12"), "00000000000012");
    }

    #[test]
    fn test_fraction_rounds_to_zero_decimals() {
        assert_eq!(normalize_id(122.6), "00000000000123");
        assert_eq!(normalize_id("122.4"), "00000000000122");
    }

    #[test]
    fn test_missing_and_empty_become_all_zero() {
        assert_eq!(normalize_id(RawCell::Missing), "00000000000000");
        assert_eq!(normalize_id(&json!(null)), "00000000000000");
        assert_eq!(normalize_id(""), "00000000000000");
        assert_eq!(normalize_id("no digits here"), "00000000000000");
    }

    #[test]
    fn test_every_input_yields_canonical_key() {
        let inputs: Vec<RawCell> = vec![
            "".into(),
            "-5".into(),
            "1e3".into(),
            "NaN".into(),
            "inf".into(),
            "'0000000000123".into(),
            "510101010010010099".into(),
            RawCell::Number(-42.0),
            f64::NAN.into(),
            f64::INFINITY.into(),
            RawCell::Number(1e20),
            RawCell::from(&json!(true)),
            RawCell::from(&json!([1, 2])),
            RawCell::Missing,
        ];

        for input in inputs {
            assert_canonical(&normalize_id(input));
        }
    }

    #[test]
    fn test_overlong_keeps_leading_digits() {
        // Detail-row ids carry a 2-digit suffix on top of the parent key
        assert_eq!(normalize_id("'5101010100100103"), "51010101001001");
    }

    #[test]
    fn test_negative_number_drops_sign() {
        assert_eq!(normalize_id(-5i64), "00000000000005");
        assert_eq!(normalize_id("-5"), "00000000000005");
    }
}
