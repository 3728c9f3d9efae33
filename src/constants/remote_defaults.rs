use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::envvars;

pub static REMOTE_DEFAULTS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    HashMap::from([
        (envvars::SHEETS_API_BASE_URL, "https://sheets.googleapis.com"),
        (envvars::FIRESTORE_API_BASE_URL, "https://firestore.googleapis.com"),
        (envvars::GOOGLE_TOKEN_URI, "https://oauth2.googleapis.com/token"),
    ])
});
