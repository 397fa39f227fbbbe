//! Precondition gates
//!
//! Each gate is a pass/fail check the orchestrator runs before any
//! deployment adapter. Gates report a [`GateResult`] instead of raising;
//! only the orchestrator decides to stop the pipeline.

pub mod build;
pub mod git;
pub mod readiness;
pub mod toolchain;

use std::time::Duration;

pub use build::BuildStage;
pub use git::GitGate;
pub use readiness::{ReadinessGate, ReadinessReport, ReadinessState};
pub use toolchain::ToolchainGate;

/// Timeout classes for external invocations.
pub mod timeouts {
    use super::Duration;

    /// Short probes: version queries, whoami, status checks.
    pub const PROBE: Duration = Duration::from_secs(30);
    /// Package installs.
    pub const INSTALL: Duration = Duration::from_secs(300);
    /// Project builds.
    pub const BUILD: Duration = Duration::from_secs(600);
    /// Deploy invocations.
    pub const DEPLOY: Duration = Duration::from_secs(300);
    /// Interactive login flows.
    pub const LOGIN: Duration = Duration::from_secs(120);
}

/// Outcome of one gate stage.
#[derive(Debug, Clone)]
pub struct GateResult {
    pub passed: bool,
    pub remediation_attempted: bool,
    pub message: String,
}

impl GateResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            remediation_attempted: false,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            remediation_attempted: false,
            message: message.into(),
        }
    }

    pub fn with_remediation(mut self) -> Self {
        self.remediation_attempted = true;
        self
    }
}
