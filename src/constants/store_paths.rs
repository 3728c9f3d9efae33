pub const COLLECTION: &str = "dataStore";
pub const PONDS_COLLECTION: &str = "ponds";
pub const POND_ID: &str = "pond1";
pub const SYSTEM_ID: &str = "system1";
