use std::time::Duration;

pub const LOG_LEVEL: &str = "info";
pub const PORT: u16 = 3000;

/// Value stored for any quantity the sensor did not report
pub const SENTINEL_VALUE: f64 = 0.01;

pub const GATE_OPEN_PERIOD: Duration = Duration::from_secs(10 * 60);
pub const STALENESS_CHECK_PERIOD: Duration = Duration::from_secs(20 * 60);
pub const STALENESS_THRESHOLD: Duration = Duration::from_secs(20 * 60);

/// Fixed UTC+5:30 offset used for snapshot keys
pub const TIMESTAMP_KEY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
pub const SHEET_TIMEZONE: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

pub const SHEET_RANGE: &str = "Sheet1!A:E";
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

pub const TOKEN_LIFETIME_SECS: i64 = 3600;
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;
