//! Hosting platform identifiers and recommendation.

pub mod advisor;
pub mod types;

pub use advisor::PlatformAdvisor;
pub use types::{CliRequirement, InstallMethod, PlatformId, PlatformRecommendation};
