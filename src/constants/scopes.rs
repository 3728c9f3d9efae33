pub const SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DATASTORE: &str = "https://www.googleapis.com/auth/datastore";
