pub const PORT: &str = "PORT";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

pub const PROJECT_ID: &str = "PROJECT_ID";
pub const CLIENT_EMAIL: &str = "CLIENT_EMAIL";
pub const RSA: &str = "RSA";

pub const SHEET_ID: &str = "SHEET_ID";
pub const SHEET_RAW_ID: &str = "SHEET_RAW_ID";
pub const EMAIL: &str = "EMAIL";

pub const SHEETS_API_BASE_URL: &str = "SHEETS_API_BASE_URL";
pub const FIRESTORE_API_BASE_URL: &str = "FIRESTORE_API_BASE_URL";
pub const GOOGLE_TOKEN_URI: &str = "GOOGLE_TOKEN_URI";
