//! Timestamp utilities

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a submission timestamp the way the sheet has always stored it
///
/// Indonesian locale style: day/month/year without zero padding, then
/// dot-separated 24h time, e.g. `1/8/2025, 09.05.07`.
pub fn format_submission_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%-d/%-m/%Y, %H.%M.%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_format_unpadded_date_padded_time() {
        let t = Utc.with_ymd_and_hms(2025, 8, 1, 9, 5, 7).unwrap();
        assert_eq!(format_submission_timestamp(&t), "1/8/2025, 09.05.07");
    }

    #[test]
    fn test_format_two_digit_fields() {
        let t = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(format_submission_timestamp(&t), "31/12/2025, 23.59.00");
    }
}
