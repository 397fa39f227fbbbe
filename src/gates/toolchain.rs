//! Platform CLI availability gate
//!
//! Probes the CLI tool a platform requires and, when missing, walks one
//! remediation cycle: consented auto-install (npm tools) or a manual-install
//! acknowledgment (git), followed by exactly one re-probe.

use crate::exec::{CommandRunner, OutcomeStatus};
use crate::gates::{timeouts, GateResult};
use crate::interact::Prompter;
use crate::platform::{InstallMethod, PlatformId};
use std::path::Path;
use tracing::{info, warn};

pub struct ToolchainGate<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    project_dir: &'a Path,
}

impl<'a> ToolchainGate<'a> {
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

    /// Ensures the CLI tool for `platform` is available.
    pub async fn ensure(&self, platform: PlatformId) -> GateResult {
        let requirement = match platform.cli_requirement() {
            Some(requirement) => requirement,
            None => {
                return GateResult::pass(format!("{} doesn't require a specific CLI", platform))
            }
        };

        if self.probe(requirement.command).await {
            info!(tool = requirement.command, "CLI already installed");
            return GateResult::pass(format!("{} is already installed", requirement.command));
        }

        warn!(tool = requirement.command, %platform, "CLI not found");

        match requirement.install {
            InstallMethod::Npm { package } => {
                self.auto_install(requirement.command, package).await
            }
            InstallMethod::Manual { url } => {
                self.manual_install(requirement.command, url).await
            }
        }
    }

    async fn probe(&self, command: &str) -> bool {
        let outcome = self
            .runner
            .run(command, &["--version"], self.project_dir, timeouts::PROBE)
            .await;
        outcome.succeeded()
    }

    async fn auto_install(&self, command: &str, package: &str) -> GateResult {
        let question = format!(
            "{} not found. Do you want me to install it automatically?",
            command
        );
        if !self.prompter.confirm(&question) {
            return GateResult::fail(format!(
                "{} is required. Install it manually: npm install -g {}",
                command, package
            ));
        }

        info!(tool = command, package, "Installing CLI via npm");
        let install = self
            .runner
            .run(
                "npm",
                &["install", "-g", package],
                self.project_dir,
                timeouts::INSTALL,
            )
            .await;

        if !install.succeeded() {
            let detail = match install.status {
                OutcomeStatus::TimedOut => "installation timed out".to_string(),
                _ => install.stderr.trim().to_string(),
            };
            return GateResult::fail(format!(
                "Installing {} failed: {}. Install it manually: npm install -g {}",
                command, detail, package
            ))
            .with_remediation();
        }

        // Single re-probe after the install attempt, nothing beyond that.
        if self.probe(command).await {
            GateResult::pass(format!("{} installed successfully", command)).with_remediation()
        } else {
            GateResult::fail(format!(
                "{} still not found after installation. Restart your terminal and try again",
                command
            ))
            .with_remediation()
        }
    }

    async fn manual_install(&self, command: &str, url: &str) -> GateResult {
        self.prompter.acknowledge(&format!(
            "{} requires manual installation.\nDownload and install from: {}\nAfter installing, restart your terminal.",
            command, url
        ));

        if self.probe(command).await {
            GateResult::pass(format!("{} successfully installed", command)).with_remediation()
        } else {
            GateResult::fail(format!(
                "{} still not found. Install it from {} and run again",
                command, url
            ))
            .with_remediation()
        }
    }
}
