//! End-to-end deployment pipeline.

pub mod orchestrator;

pub use orchestrator::{DeploymentReport, Orchestrator, PipelineStage};
