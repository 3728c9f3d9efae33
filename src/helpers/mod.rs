mod load_dotenv;
mod time;

pub use load_dotenv::load_dotenv;
pub use time::{sheet_timestamp, timestamp_key};
