mod http_agent;

pub mod firestore;
pub mod google_auth;
pub mod in_memory;
pub mod sheets;

pub use http_agent::get_ureq_agent;
