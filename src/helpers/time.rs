use chrono::{DateTime, TimeDelta, Utc};

use crate::constants::defaults;

/// Snapshot document key: the instant shifted to UTC+5:30, as `YYYY:MM:DD HH:MM:SS`
pub fn timestamp_key(instant: DateTime<Utc>) -> String {
    let shifted = instant + TimeDelta::seconds(defaults::TIMESTAMP_KEY_OFFSET_SECS.into());
    shifted.naive_utc().format("%Y:%m:%d %H:%M:%S").to_string()
}

/// Human-readable timestamp written into the first column of both sheets
pub fn sheet_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&defaults::SHEET_TIMEZONE)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use regex::Regex;

    #[test]
    fn test_timestamp_key_crosses_midnight() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 18, 31, 5).unwrap();
        assert_eq!(timestamp_key(instant), "2024:01:03 00:01:05");
    }

    #[test]
    fn test_timestamp_key_zero_padding() {
        let instant = Utc.with_ymd_and_hms(2023, 3, 4, 0, 0, 9).unwrap();
        assert_eq!(timestamp_key(instant), "2023:03:04 05:30:09");
        assert!(Regex::new(r"^\d{4}:\d{2}:\d{2} \d{2}:\d{2}:\d{2}$")
            .unwrap()
            .is_match(&timestamp_key(Utc::now())));
    }

    #[test]
    fn test_sheet_timestamp() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 18, 31, 5).unwrap();
        assert_eq!(sheet_timestamp(instant), "1/3/2024, 12:01:05 AM");

        let afternoon = Utc.with_ymd_and_hms(2024, 11, 20, 9, 5, 0).unwrap();
        assert_eq!(sheet_timestamp(afternoon), "11/20/2024, 2:35:00 PM");
    }
}
