//! Project-type classification.

pub mod classifier;
pub mod types;

pub use classifier::ProjectClassifier;
pub use types::ProjectType;
