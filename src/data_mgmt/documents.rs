//! Document layouts written to the document store
use chrono::{DateTime, Utc};

use crate::constants::store_paths;
use crate::interfaces::firestore::{DocValue, Document, DocumentPath};

use super::models::{sentinel_value, Reading};

/// `dataStore/{account}/pond1/system1`: one entry per snapshot, keyed by timestamp
pub fn snapshot_history_path(account: &str) -> DocumentPath {
    DocumentPath::new([
        store_paths::COLLECTION,
        account,
        store_paths::POND_ID,
        store_paths::SYSTEM_ID,
    ])
}

/// `dataStore/{account}`: holds the last snapshot under the system key
pub fn account_summary_path(account: &str) -> DocumentPath {
    DocumentPath::new([store_paths::COLLECTION, account])
}

/// `ponds/pond1`: read by the mobile client
pub fn pond_mirror_path() -> DocumentPath {
    DocumentPath::new([store_paths::PONDS_COLLECTION, store_paths::POND_ID])
}

fn snapshot_entry(reading: &Reading) -> DocValue {
    DocValue::Map(Document::from([
        ("DO".to_string(), DocValue::from(&reading.dissolved_oxygen)),
        ("TEMP".to_string(), DocValue::from(&reading.temperature)),
        ("PH".to_string(), DocValue::from(&reading.ph)),
        ("TDS".to_string(), DocValue::from(&reading.conductivity)),
    ]))
}

pub fn snapshot_history_fields(reading: &Reading, key: String) -> Document {
    Document::from([(key, snapshot_entry(reading))])
}

pub fn account_summary_fields(reading: &Reading) -> Document {
    Document::from([(store_paths::SYSTEM_ID.to_string(), snapshot_entry(reading))])
}

pub fn pond_mirror_fields(reading: &Reading, now: DateTime<Utc>) -> Document {
    let placeholder = DocValue::from(&sentinel_value());
    Document::from([
        ("Do".to_string(), DocValue::from(&reading.dissolved_oxygen)),
        ("temperature".to_string(), DocValue::from(&reading.temperature)),
        ("pH".to_string(), DocValue::from(&reading.ph)),
        ("Tds".to_string(), DocValue::from(&reading.conductivity)),
        ("Turbidity".to_string(), placeholder.clone()),
        ("Nitrate".to_string(), placeholder),
        ("timestamp".to_string(), DocValue::Timestamp(now)),
    ])
}
