//! Build stage
//!
//! Node project types get a toolchain check (node + npm, with one prompted
//! re-check), a dependency install when `node_modules` is absent, and a
//! bounded `npm run build`. Two output signatures get special handling:
//! "missing script" passes (a project without a build script is not an
//! error), and "command not found" offers exactly one remediation cycle —
//! install dependencies, retry the build once. Everything else nonzero, and
//! any timeout, fails the stage.

use crate::exec::{CommandOutcome, CommandRunner, OutcomeStatus};
use crate::gates::{timeouts, GateResult};
use crate::interact::Prompter;
use crate::project::ProjectType;
use std::path::Path;
use tracing::{info, warn};

const MISSING_SCRIPT_SIGNATURE: &str = "missing script";
const TOOL_NOT_FOUND_SIGNATURES: [&str; 2] = ["not recognized", "command not found"];

enum BuildVerdict {
    Ok,
    NoBuildScript,
    ToolMissing,
    TimedOut,
    Failed,
}

fn interpret(outcome: &CommandOutcome) -> BuildVerdict {
    if outcome.succeeded() {
        return BuildVerdict::Ok;
    }
    if outcome.status == OutcomeStatus::TimedOut {
        return BuildVerdict::TimedOut;
    }
    let output = outcome.combined_output().to_lowercase();
    if output.contains(MISSING_SCRIPT_SIGNATURE) {
        return BuildVerdict::NoBuildScript;
    }
    if TOOL_NOT_FOUND_SIGNATURES
        .iter()
        .any(|signature| output.contains(signature))
    {
        return BuildVerdict::ToolMissing;
    }
    BuildVerdict::Failed
}

pub struct BuildStage<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    project_dir: &'a Path,
}

impl<'a> BuildStage<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
        project_dir: &'a Path,
    ) -> Self {
        Self {
            runner,
            prompter,
            project_dir,
        }
    }

    /// Builds the project when its type requires it.
    pub async fn build(&self, project_type: ProjectType) -> GateResult {
        if !project_type.requires_build() {
            return GateResult::pass("No build step required");
        }

        if !self.node_available().await {
            self.prompter.acknowledge(
                "Node.js is required. Please install it from https://nodejs.org/",
            );
            if !self.prompter.confirm("Check again after install?") || !self.node_available().await
            {
                return GateResult::fail(
                    "Node.js/npm not found. Install Node.js from https://nodejs.org/ and run again",
                );
            }
        }

        if !self.project_dir.join("node_modules").exists() {
            info!("node_modules missing, installing dependencies");
            let install = self.npm_install().await;
            if !install.succeeded() {
                return GateResult::fail(format!(
                    "Failed to install dependencies: {}",
                    install.stderr.trim()
                ));
            }
        }

        info!("Running npm run build");
        let first = self.npm_build().await;
        match interpret(&first) {
            BuildVerdict::Ok => GateResult::pass("Build successful"),
            BuildVerdict::NoBuildScript => {
                info!("No build script configured, proceeding without build");
                GateResult::pass("No build script configured, proceeding without build")
            }
            BuildVerdict::TimedOut => {
                GateResult::fail("Build timed out; try running the build manually and run again")
            }
            BuildVerdict::ToolMissing => self.remediate_and_retry(&first).await,
            BuildVerdict::Failed => {
                GateResult::fail(format!("Build failed: {}", first.stderr.trim()))
            }
        }
    }

    /// Offers one dependency install, then retries the build exactly once.
    async fn remediate_and_retry(&self, first: &CommandOutcome) -> GateResult {
        warn!("Build tool not found, offering dependency install");
        if !self.prompter.confirm("Install dependencies now?") {
            return GateResult::fail(format!("Build failed: {}", first.stderr.trim()));
        }

        let install = self.npm_install().await;
        if !install.succeeded() {
            return GateResult::fail(format!("Build failed: {}", first.stderr.trim()))
                .with_remediation();
        }

        let retry = self.npm_build().await;
        match interpret(&retry) {
            BuildVerdict::Ok => {
                GateResult::pass("Build successful after installing dependencies")
                    .with_remediation()
            }
            BuildVerdict::NoBuildScript => {
                GateResult::pass("No build script configured, proceeding without build")
                    .with_remediation()
            }
            BuildVerdict::TimedOut => GateResult::fail(
                "Build timed out; try running the build manually and run again",
            )
            .with_remediation(),
            // No second remediation, whatever the retry printed.
            BuildVerdict::ToolMissing | BuildVerdict::Failed => {
                GateResult::fail(format!("Build failed: {}", retry.stderr.trim()))
                    .with_remediation()
            }
        }
    }

    async fn node_available(&self) -> bool {
        let node = self
            .runner
            .run("node", &["--version"], self.project_dir, timeouts::PROBE)
            .await;
        if !node.succeeded() {
            warn!("Node.js not found");
            return false;
        }

        let npm = self
            .runner
            .run("npm", &["--version"], self.project_dir, timeouts::PROBE)
            .await;
        if !npm.succeeded() {
            warn!("npm not found");
            return false;
        }
        true
    }

    async fn npm_install(&self) -> CommandOutcome {
        self.runner
            .run("npm", &["install"], self.project_dir, timeouts::INSTALL)
            .await
    }

    async fn npm_build(&self) -> CommandOutcome {
        self.runner
            .run("npm", &["run", "build"], self.project_dir, timeouts::BUILD)
            .await
    }
}
