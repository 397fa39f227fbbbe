//! Pipeline orchestrator
//!
//! Drives one deployment run: classify the project, recommend a platform,
//! check the platform CLI, scaffold missing files, run the readiness stages,
//! and hand off to the platform adapter. Each stage can stop the run; the
//! report records how far it got and why it stopped.

use crate::deploy::{adapter_for, DeployContext, DeploymentResult};
use crate::exec::CommandRunner;
use crate::gates::{GateResult, ReadinessGate, ReadinessReport, ToolchainGate};
use crate::interact::Prompter;
use crate::platform::{PlatformAdvisor, PlatformId, PlatformRecommendation};
use crate::project::{ProjectClassifier, ProjectType};
use crate::scaffold;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The furthest stage a run reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Classify,
    Recommend,
    Toolchain,
    Scaffold,
    Readiness,
    Deploy,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Classify => "classify",
            PipelineStage::Recommend => "recommend",
            PipelineStage::Toolchain => "toolchain",
            PipelineStage::Scaffold => "scaffold",
            PipelineStage::Readiness => "readiness",
            PipelineStage::Deploy => "deploy",
        };
        f.write_str(name)
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub project_type: ProjectType,
    pub recommendation: Option<PlatformRecommendation>,
    pub stage_reached: PipelineStage,
    pub toolchain: Option<GateResult>,
    pub readiness: Option<ReadinessReport>,
    pub deployment: Option<DeploymentResult>,
    /// Set when the run stopped before a successful deployment.
    pub failure: Option<String>,
}

impl DeploymentReport {
    pub fn succeeded(&self) -> bool {
        self.deployment.as_ref().is_some_and(|d| d.success)
    }

    fn halted(project_type: ProjectType, stage: PipelineStage, failure: impl Into<String>) -> Self {
        Self {
            project_type,
            recommendation: None,
            stage_reached: stage,
            toolchain: None,
            readiness: None,
            deployment: None,
            failure: Some(failure.into()),
        }
    }

    /// Report for a run that died outside normal control flow.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::halted(ProjectType::Unknown, PipelineStage::Classify, message)
    }
}

/// Owns the collaborators for one or more runs. Arc-held so a run can be
/// spawned onto the runtime and panics caught at the join boundary.
pub struct Orchestrator {
    runner: Arc<dyn CommandRunner>,
    prompter: Arc<dyn Prompter>,
    classifier: ProjectClassifier,
    advisor: PlatformAdvisor,
    paid_platforms: Vec<PlatformId>,
}

impl Orchestrator {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        prompter: Arc<dyn Prompter>,
        classifier: ProjectClassifier,
        advisor: PlatformAdvisor,
    ) -> Self {
        Self {
            runner,
            prompter,
            classifier,
            advisor,
            paid_platforms: Vec::new(),
        }
    }

    pub fn with_paid_platforms(mut self, platforms: Vec<PlatformId>) -> Self {
        self.paid_platforms = platforms;
        self
    }

    pub async fn run(&self, project_dir: PathBuf) -> DeploymentReport {
        let project_type = self.classifier.classify(&project_dir).await;
        info!(%project_type, "Project classified");

        if project_type == ProjectType::Unknown {
            return DeploymentReport::halted(
                project_type,
                PipelineStage::Classify,
                "Could not determine the project type; add a package.json, \
                 requirements.txt, or index.html and run again",
            );
        }

        let recommendation = self.advisor.recommend(project_type).await;
        info!(platform = %recommendation.platform, "Platform recommended");

        let toolchain = self.ensure_toolchain(recommendation.platform, &project_dir).await;
        if !toolchain.passed {
            warn!(platform = %recommendation.platform, "Toolchain gate failed");
            return DeploymentReport {
                failure: Some(toolchain.message.clone()),
                project_type,
                recommendation: Some(recommendation),
                stage_reached: PipelineStage::Toolchain,
                toolchain: Some(toolchain),
                readiness: None,
                deployment: None,
            };
        }

        match scaffold::create_required_files(project_type, recommendation.platform, &project_dir)
        {
            Ok(created) if !created.is_empty() => {
                info!(files = ?created, "Scaffolded missing deployment files");
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Scaffolding failed");
                return DeploymentReport {
                    failure: Some(format!("Could not create deployment files: {}", e)),
                    project_type,
                    recommendation: Some(recommendation),
                    stage_reached: PipelineStage::Scaffold,
                    toolchain: Some(toolchain),
                    readiness: None,
                    deployment: None,
                };
            }
        }

        let initial_platform = recommendation.platform;
        let gate = ReadinessGate::new(
            self.runner.as_ref(),
            self.prompter.as_ref(),
            &self.advisor,
            &project_dir,
        )
        .with_paid_platforms(self.paid_platforms.iter().copied());
        let readiness = gate.check(project_type, recommendation).await;

        if !readiness.passed() {
            let failure = readiness
                .failure_message()
                .unwrap_or("Readiness checks failed")
                .to_string();
            return DeploymentReport {
                failure: Some(failure),
                project_type,
                recommendation: Some(readiness.recommendation.clone()),
                stage_reached: PipelineStage::Readiness,
                toolchain: Some(toolchain),
                readiness: Some(readiness),
                deployment: None,
            };
        }

        // A paid decline may have swapped the platform after the first
        // toolchain check; the replacement's CLI gets checked too.
        let final_recommendation = readiness.recommendation.clone();
        let mut toolchain = toolchain;
        if final_recommendation.platform != initial_platform {
            let recheck = self
                .ensure_toolchain(final_recommendation.platform, &project_dir)
                .await;
            if !recheck.passed {
                return DeploymentReport {
                    failure: Some(recheck.message.clone()),
                    project_type,
                    recommendation: Some(final_recommendation),
                    stage_reached: PipelineStage::Toolchain,
                    toolchain: Some(recheck),
                    readiness: Some(readiness),
                    deployment: None,
                };
            }
            toolchain = recheck;
        }

        info!(platform = %final_recommendation.platform, "Starting deployment");
        let adapter = adapter_for(final_recommendation.platform);
        let ctx = DeployContext {
            runner: self.runner.as_ref(),
            prompter: self.prompter.as_ref(),
            project_dir: &project_dir,
            project_type,
        };
        let deployment = adapter.deploy(&ctx).await;

        let failure = if deployment.success {
            info!(url = ?deployment.live_url, "Deployment succeeded");
            None
        } else {
            deployment.diagnostic.clone()
        };

        DeploymentReport {
            project_type,
            recommendation: Some(final_recommendation),
            stage_reached: PipelineStage::Deploy,
            toolchain: Some(toolchain),
            readiness: Some(readiness),
            deployment: Some(deployment),
            failure,
        }
    }

    async fn ensure_toolchain(&self, platform: PlatformId, project_dir: &Path) -> GateResult {
        let gate = ToolchainGate::new(self.runner.as_ref(), self.prompter.as_ref(), project_dir);
        gate.ensure(platform).await
    }
}
