pub mod defaults;
pub mod envvars;
pub mod scopes;
pub mod store_paths;

mod remote_defaults;

pub use remote_defaults::REMOTE_DEFAULTS;
