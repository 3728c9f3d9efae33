pub mod documents;
pub mod models;

mod normalizer;

pub use models::{LatestValues, Reading};
pub use normalizer::normalize;
