//! skiff - AI-assisted deployment pipeline for web projects
//!
//! This library takes a project directory from "what is this?" to "it's
//! live": it classifies the tech stack, recommends a free hosting platform,
//! verifies the platform CLI and repository are ready, builds the project,
//! and drives the platform's own tooling to deploy it.
//!
//! # Core Concepts
//!
//! - **Classification**: Deciding what kind of project a directory holds
//!   (Next.js, Vite, React, static, Flask). An Ollama model answers first
//!   when available; manifest inspection decides otherwise.
//! - **Recommendation**: Matching the project type to a hosting platform,
//!   again AI-first with a deterministic table behind it.
//! - **Gates**: Pass/fail checks run before deploying - platform CLI
//!   availability, paid-platform consent, git readiness, and a working
//!   build. Each gate remediates at most once and never loops.
//! - **Adapters**: One [`deploy::DeployAdapter`] per platform, driving that
//!   platform's CLI through an injected [`exec::CommandRunner`] so every
//!   decision path is testable without touching the network.
//!
//! # Example Usage
//!
//! ```ignore
//! use skiff::exec::SystemRunner;
//! use skiff::interact::TerminalPrompter;
//! use skiff::pipeline::Orchestrator;
//! use skiff::platform::PlatformAdvisor;
//! use skiff::project::ProjectClassifier;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! async fn deploy(project: PathBuf) -> bool {
//!     let orchestrator = Orchestrator::new(
//!         Arc::new(SystemRunner),
//!         Arc::new(TerminalPrompter),
//!         ProjectClassifier::new(None),
//!         PlatformAdvisor::new(None),
//!     );
//!     orchestrator.run(project).await.succeeded()
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`project`]: Project type model and classifier
//! - [`platform`]: Platform model and recommendation advisor
//! - [`gates`]: Pre-deploy readiness checks
//! - [`deploy`]: Per-platform deployment adapters
//! - [`pipeline`]: The orchestrator tying the stages together

// Public modules
pub mod ai;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod exec;
pub mod gates;
pub mod interact;
pub mod pipeline;
pub mod platform;
pub mod project;
pub mod scaffold;

// Re-export key types for convenient access
pub use ai::{BackendError, MockBackend, OllamaBackend, PredictionBackend};
pub use config::{ConfigError, SkiffConfig};
pub use deploy::{adapter_for, DeployAdapter, DeployContext, DeploymentResult};
pub use exec::{CommandOutcome, CommandRunner, MockRunner, SystemRunner};
pub use gates::{GateResult, ReadinessReport};
pub use interact::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use pipeline::{DeploymentReport, Orchestrator, PipelineStage};
pub use platform::{PlatformAdvisor, PlatformId, PlatformRecommendation};
pub use project::{ProjectClassifier, ProjectType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
