//! Deployment readiness gate
//!
//! Runs the pre-deploy checks in a fixed order: paid-platform consent,
//! git readiness (only for platforms that deploy from a remote repository),
//! then the project build. The walk through [`ReadinessState`] is strictly
//! forward; the first failing stage is terminal and nothing done by earlier
//! stages is rolled back.
//!
//! Declining a paid platform triggers exactly one re-recommendation. If the
//! replacement is paid too the user gets one more consent question, and a
//! second decline fails the run outright.

use crate::exec::CommandRunner;
use crate::gates::{BuildStage, GateResult, GitGate};
use crate::interact::Prompter;
use crate::platform::{PlatformAdvisor, PlatformId, PlatformRecommendation};
use crate::project::ProjectType;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Node reached in the readiness walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    NotChecked,
    /// Paid-platform consent was required and is the last stage reached.
    Consenting,
    /// No consent was needed for the recommended platform.
    Skipped,
    GitReady,
    GitFailed,
    Built,
    BuildFailed,
    AllPassed,
}

/// What the gate decided, and where it stopped.
#[derive(Debug, Clone)]
pub struct ReadinessReport {
    /// The recommendation in effect after consent. Differs from the input
    /// when a paid decline was answered with a replacement platform.
    pub recommendation: PlatformRecommendation,
    pub state: ReadinessState,
    pub consent: GateResult,
    pub git: Option<GateResult>,
    pub build: Option<GateResult>,
}

impl ReadinessReport {
    pub fn passed(&self) -> bool {
        self.state == ReadinessState::AllPassed
    }

    /// Message of the stage the gate stopped at.
    pub fn failure_message(&self) -> Option<&str> {
        match self.state {
            ReadinessState::Consenting if !self.consent.passed => Some(&self.consent.message),
            ReadinessState::GitFailed => self.git.as_ref().map(|r| r.message.as_str()),
            ReadinessState::BuildFailed => self.build.as_ref().map(|r| r.message.as_str()),
            _ => None,
        }
    }
}

pub struct ReadinessGate<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    advisor: &'a PlatformAdvisor,
    project_dir: &'a Path,
    paid_platforms: HashSet<PlatformId>,
}

impl<'a> ReadinessGate<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
        advisor: &'a PlatformAdvisor,
        project_dir: &'a Path,
    ) -> Self {
        Self {
            runner,
            prompter,
            advisor,
            project_dir,
            // None of the supported platforms charge for the tiers this
            // tool targets, so the set starts empty.
            paid_platforms: HashSet::new(),
        }
    }

    /// Marks platforms whose selection requires explicit consent.
    pub fn with_paid_platforms(mut self, platforms: impl IntoIterator<Item = PlatformId>) -> Self {
        self.paid_platforms = platforms.into_iter().collect();
        self
    }

    /// Walks consent, git, and build for `recommendation`, stopping at the
    /// first failure.
    pub async fn check(
        &self,
        project_type: ProjectType,
        recommendation: PlatformRecommendation,
    ) -> ReadinessReport {
        let (recommendation, consent) = self.consent_stage(project_type, recommendation).await;
        if !consent.passed {
            return ReadinessReport {
                recommendation,
                state: ReadinessState::Consenting,
                consent,
                git: None,
                build: None,
            };
        }

        let git = if recommendation.platform.requires_remote_repo() {
            let gate = GitGate::new(self.runner, self.prompter, self.project_dir);
            let result = gate.ensure(project_type).await;
            if !result.passed {
                warn!(platform = %recommendation.platform, "git readiness failed");
                return ReadinessReport {
                    recommendation,
                    state: ReadinessState::GitFailed,
                    consent,
                    git: Some(result),
                    build: None,
                };
            }
            Some(result)
        } else {
            None
        };

        let stage = BuildStage::new(self.runner, self.prompter, self.project_dir);
        let build = stage.build(project_type).await;
        let state = if build.passed {
            ReadinessState::AllPassed
        } else {
            ReadinessState::BuildFailed
        };
        if state == ReadinessState::AllPassed {
            info!(platform = %recommendation.platform, "all readiness checks passed");
        }

        ReadinessReport {
            recommendation,
            state,
            consent,
            git,
            build: Some(build),
        }
    }

    /// Consent for paid platforms, with at most one replacement
    /// recommendation on decline.
    async fn consent_stage(
        &self,
        project_type: ProjectType,
        recommendation: PlatformRecommendation,
    ) -> (PlatformRecommendation, GateResult) {
        if !self.paid_platforms.contains(&recommendation.platform) {
            return (recommendation, GateResult::pass("No paid-platform consent needed"));
        }

        let question = format!(
            "{} has usage-based pricing. Continue with it?",
            recommendation.platform
        );
        if self.prompter.confirm(&question) {
            return (recommendation, GateResult::pass("Paid platform accepted"));
        }

        info!(
            declined = %recommendation.platform,
            "paid platform declined, asking for an alternative"
        );
        let replacement = self.advisor.recommend(project_type).await;

        if !self.paid_platforms.contains(&replacement.platform) {
            let message = format!("Switched to {}", replacement.platform);
            return (replacement, GateResult::pass(message).with_remediation());
        }

        let question = format!(
            "{} also has usage-based pricing and is the best remaining fit. Continue?",
            replacement.platform
        );
        if self.prompter.confirm(&question) {
            return (
                replacement,
                GateResult::pass("Paid platform accepted").with_remediation(),
            );
        }

        (
            replacement,
            GateResult::fail("No acceptable platform; both recommendations were declined")
                .with_remediation(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::exec::{CommandOutcome, MockRunner};
    use crate::interact::ScriptedPrompter;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn free_advisor() -> PlatformAdvisor {
        PlatformAdvisor::new(None)
    }

    #[tokio::test]
    async fn free_platform_skips_consent_and_build_for_static() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        let advisor = free_advisor();
        let gate = ReadinessGate::new(&runner, &prompter, &advisor, dir.path());

        let recommendation = PlatformAdvisor::fallback_recommendation(ProjectType::Static);
        // GitHub Pages needs a remote repository, so hand the gate a repo
        // that is already clean and wired up.
        fs::create_dir(dir.path().join(".git")).unwrap();
        runner.expect("git", &["remote"], CommandOutcome::success("origin\n"));
        runner.expect("git", &["status", "--porcelain"], CommandOutcome::success(""));
        prompter.push_confirm(false); // skip push

        let report = gate.check(ProjectType::Static, recommendation).await;

        assert!(report.passed());
        assert_eq!(report.state, ReadinessState::AllPassed);
        assert!(report.git.is_some());
        // Static projects never run build commands.
        assert_eq!(runner.count_calls("npm", &[]), 0);
    }

    #[tokio::test]
    async fn paid_platform_accepted_on_first_ask() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(true);
        let advisor = free_advisor();
        let gate = ReadinessGate::new(&runner, &prompter, &advisor, dir.path())
            .with_paid_platforms([PlatformId::Vercel]);

        let recommendation = PlatformAdvisor::fallback_recommendation(ProjectType::PythonServer);
        let report = gate.check(ProjectType::PythonServer, recommendation).await;

        assert!(report.passed());
        assert_eq!(report.recommendation.platform, PlatformId::Vercel);
        assert!(!report.consent.remediation_attempted);
    }

    #[tokio::test]
    async fn paid_decline_gets_exactly_one_replacement() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(false); // decline Vercel

        let backend = Arc::new(MockBackend::new());
        backend.push_text(
            r#"{"platform": "github-pages", "reason": "free static hosting", "setup_steps": []}"#,
        );
        let advisor = PlatformAdvisor::new(Some(backend.clone()));
        let gate = ReadinessGate::new(&runner, &prompter, &advisor, dir.path())
            .with_paid_platforms([PlatformId::Vercel]);

        fs::create_dir(dir.path().join(".git")).unwrap();
        runner.expect("git", &["remote"], CommandOutcome::success("origin\n"));
        runner.expect("git", &["status", "--porcelain"], CommandOutcome::success(""));
        prompter.push_confirm(false); // skip push

        let recommendation = PlatformAdvisor::fallback_recommendation(ProjectType::PythonServer);
        let report = gate.check(ProjectType::PythonServer, recommendation).await;

        assert!(report.passed());
        assert_eq!(report.recommendation.platform, PlatformId::GitHubPages);
        assert!(report.consent.remediation_attempted);
        assert_eq!(backend.prompts().len(), 1);
    }

    #[tokio::test]
    async fn two_paid_declines_fail_the_run() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(false); // decline Vercel
        prompter.push_confirm(false); // decline Netlify too

        let backend = Arc::new(MockBackend::new());
        backend.push_text(
            r#"{"platform": "netlify", "reason": "alternative host", "setup_steps": []}"#,
        );
        let advisor = PlatformAdvisor::new(Some(backend.clone()));
        let gate = ReadinessGate::new(&runner, &prompter, &advisor, dir.path())
            .with_paid_platforms([PlatformId::Vercel, PlatformId::Netlify]);

        let recommendation = PlatformAdvisor::fallback_recommendation(ProjectType::PythonServer);
        let report = gate.check(ProjectType::PythonServer, recommendation).await;

        assert!(!report.passed());
        assert_eq!(report.state, ReadinessState::Consenting);
        assert!(report.failure_message().unwrap().contains("declined"));
        // One replacement was sought, no second loop.
        assert_eq!(backend.prompts().len(), 1);
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn git_failure_stops_before_build() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(false); // decline git init
        let advisor = free_advisor();
        let gate = ReadinessGate::new(&runner, &prompter, &advisor, dir.path());

        let recommendation = PlatformAdvisor::fallback_recommendation(ProjectType::Static);
        let report = gate.check(ProjectType::Static, recommendation).await;

        assert!(!report.passed());
        assert_eq!(report.state, ReadinessState::GitFailed);
        assert!(report.build.is_none());
        assert_eq!(runner.count_calls("npm", &[]), 0);
    }

    #[tokio::test]
    async fn build_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        let runner = MockRunner::new();
        runner.expect(
            "npm",
            &["run", "build"],
            CommandOutcome::failure(1, "", "SyntaxError in src/main.jsx"),
        );
        let prompter = ScriptedPrompter::new();
        let advisor = free_advisor();
        let gate = ReadinessGate::new(&runner, &prompter, &advisor, dir.path());

        // Netlify deploys from the local directory, so no git stage runs.
        let recommendation = PlatformAdvisor::fallback_recommendation(ProjectType::Vite);
        let report = gate.check(ProjectType::Vite, recommendation).await;

        assert!(!report.passed());
        assert_eq!(report.state, ReadinessState::BuildFailed);
        assert!(report.git.is_none());
        assert!(report.failure_message().unwrap().contains("Build failed"));
    }
}
