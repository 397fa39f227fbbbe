//! Version-control readiness gate
//!
//! Only engaged for platforms that deploy from a remotely-hosted repository.
//! Walks the project from "no repository" to "committed, remote configured,
//! optionally pushed": consented `git init` plus ignore-rules authoring, a
//! required remote, auto-commit of any dirty working tree, and an optional
//! push. Side effects are not rolled back on later failure; an initialized
//! repository stays initialized.

use crate::exec::CommandRunner;
use crate::gates::{timeouts, GateResult};
use crate::interact::Prompter;
use crate::project::ProjectType;
use crate::scaffold;
use std::path::Path;
use tracing::{info, warn};

pub struct GitGate<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    project_dir: &'a Path,
}

impl<'a> GitGate<'a> {
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

    /// Brings the repository to a deployable state or fails with the first
    /// unmet requirement.
    pub async fn ensure(&self, project_type: ProjectType) -> GateResult {
        if !self.project_dir.join(".git").exists() {
            if !self
                .prompter
                .confirm("This directory isn't a git repo. Do you want me to initialize one?")
            {
                return GateResult::fail(
                    "Repository initialization declined; this platform deploys from a git repository",
                );
            }
            if let Some(failure) = self.initialize_repo(project_type).await {
                return failure;
            }
        }

        if !self.has_remote().await {
            let url = self
                .prompter
                .input("Enter your GitHub repo URL (e.g., https://github.com/user/repo.git)", "");
            if url.is_empty() {
                return GateResult::fail(
                    "No remote configured; supply a repository URL and run again",
                );
            }
            if let Some(failure) = self.configure_remote(&url).await {
                return failure;
            }
        }

        if self.has_uncommitted_changes().await {
            info!("Working tree has uncommitted changes, committing");
            if let Some(failure) = self.commit_all("Prepare deployment").await {
                return failure;
            }
        }

        if self.prompter.confirm("Do you want to push to the remote now?") {
            let push = self
                .run_git(&["push", "-u", "origin", "main"], timeouts::INSTALL)
                .await;
            if !push.succeeded() {
                warn!(stderr = %push.stderr, "Push failed");
                return GateResult::fail(format!(
                    "Push failed: {}. Check the remote URL and your credentials",
                    push.stderr.trim()
                ));
            }
            info!("Pushed to remote");
        }

        GateResult::pass("Repository is ready")
    }

    async fn initialize_repo(&self, project_type: ProjectType) -> Option<GateResult> {
        info!("Initializing git repository");
        let init = self.run_git(&["init"], timeouts::PROBE).await;
        if !init.succeeded() {
            return Some(GateResult::fail(format!(
                "git init failed: {}",
                init.stderr.trim()
            )));
        }

        if let Err(e) = scaffold::write_gitignore(project_type, self.project_dir) {
            warn!(error = %e, "Could not write .gitignore");
        }

        let message = self
            .prompter
            .input("Enter commit message", "Initial commit");
        self.commit_all(&message).await
    }

    async fn configure_remote(&self, url: &str) -> Option<GateResult> {
        let add = self
            .run_git(&["remote", "add", "origin", url], timeouts::PROBE)
            .await;
        if !add.succeeded() {
            return Some(GateResult::fail(format!(
                "Adding remote failed: {}",
                add.stderr.trim()
            )));
        }

        let branch = self.run_git(&["branch", "-M", "main"], timeouts::PROBE).await;
        if !branch.succeeded() {
            return Some(GateResult::fail(format!(
                "Renaming branch failed: {}",
                branch.stderr.trim()
            )));
        }
        None
    }

    /// `git add .` + commit; returns the failure to report, if any.
    async fn commit_all(&self, message: &str) -> Option<GateResult> {
        let add = self.run_git(&["add", "."], timeouts::PROBE).await;
        if !add.succeeded() {
            return Some(GateResult::fail(format!(
                "git add failed: {}",
                add.stderr.trim()
            )));
        }

        let commit = self
            .run_git(&["commit", "-m", message], timeouts::PROBE)
            .await;
        if !commit.succeeded() {
            return Some(GateResult::fail(format!(
                "git commit failed: {}",
                commit.stderr.trim()
            )));
        }
        None
    }

    async fn has_remote(&self) -> bool {
        let outcome = self.run_git(&["remote"], timeouts::PROBE).await;
        outcome.succeeded() && !outcome.stdout.trim().is_empty()
    }

    async fn has_uncommitted_changes(&self) -> bool {
        let outcome = self
            .run_git(&["status", "--porcelain"], timeouts::PROBE)
            .await;
        outcome.succeeded() && !outcome.stdout.trim().is_empty()
    }

    async fn run_git(&self, args: &[&str], timeout: std::time::Duration) -> crate::exec::CommandOutcome {
        self.runner.run("git", args, self.project_dir, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutcome, MockRunner};
    use crate::interact::ScriptedPrompter;
    use std::fs;
    use tempfile::TempDir;

    fn repo_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        dir
    }

    #[tokio::test]
    async fn declining_init_is_a_hard_failure() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(false);

        let gate = GitGate::new(&runner, &prompter, dir.path());
        let result = gate.ensure(ProjectType::Static).await;

        assert!(!result.passed);
        assert!(result.message.contains("declined"));
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn initializes_commits_and_configures_remote() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        // remote probe: nothing configured yet; clean tree afterwards.
        runner.expect("git", &["remote"], CommandOutcome::success(""));
        runner.expect("git", &["status", "--porcelain"], CommandOutcome::success(""));

        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(true); // init
        prompter.push_text("First deploy"); // commit message
        prompter.push_text("https://github.com/user/site.git"); // remote URL
        prompter.push_confirm(false); // skip push

        let gate = GitGate::new(&runner, &prompter, dir.path());
        let result = gate.ensure(ProjectType::Static).await;

        assert!(result.passed, "{}", result.message);
        assert_eq!(runner.count_calls("git", &["init"]), 1);
        assert_eq!(runner.count_calls("git", &["commit", "-m", "First deploy"]), 1);
        assert_eq!(
            runner.count_calls(
                "git",
                &["remote", "add", "origin", "https://github.com/user/site.git"]
            ),
            1
        );
        assert_eq!(runner.count_calls("git", &["push"]), 0);
        assert!(dir.path().join(".gitignore").exists());
    }

    #[tokio::test]
    async fn empty_remote_url_is_a_hard_failure() {
        let dir = repo_dir();
        let runner = MockRunner::new();
        runner.expect("git", &["remote"], CommandOutcome::success(""));

        // No scripted text: the URL prompt falls back to its empty default.
        let prompter = ScriptedPrompter::new();
        let gate = GitGate::new(&runner, &prompter, dir.path());
        let result = gate.ensure(ProjectType::Static).await;

        assert!(!result.passed);
        assert!(result.message.contains("remote"));
    }

    #[tokio::test]
    async fn dirty_tree_is_auto_committed() {
        let dir = repo_dir();
        let runner = MockRunner::new();
        runner.expect("git", &["remote"], CommandOutcome::success("origin\n"));
        runner.expect(
            "git",
            &["status", "--porcelain"],
            CommandOutcome::success(" M index.html\n"),
        );

        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(false); // skip push

        let gate = GitGate::new(&runner, &prompter, dir.path());
        let result = gate.ensure(ProjectType::Static).await;

        assert!(result.passed);
        assert_eq!(
            runner.count_calls("git", &["commit", "-m", "Prepare deployment"]),
            1
        );
    }

    #[tokio::test]
    async fn consented_push_failure_fails_the_gate() {
        let dir = repo_dir();
        let runner = MockRunner::new();
        runner.expect("git", &["remote"], CommandOutcome::success("origin\n"));
        runner.expect("git", &["status", "--porcelain"], CommandOutcome::success(""));
        runner.expect(
            "git",
            &["push", "-u", "origin", "main"],
            CommandOutcome::failure(128, "", "fatal: could not read from remote"),
        );

        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(true); // push

        let gate = GitGate::new(&runner, &prompter, dir.path());
        let result = gate.ensure(ProjectType::Static).await;

        assert!(!result.passed);
        assert!(result.message.contains("Push failed"));
    }

    #[tokio::test]
    async fn declining_push_is_not_a_failure() {
        let dir = repo_dir();
        let runner = MockRunner::new();
        runner.expect("git", &["remote"], CommandOutcome::success("origin\n"));
        runner.expect("git", &["status", "--porcelain"], CommandOutcome::success(""));

        let prompter = ScriptedPrompter::new();
        prompter.push_confirm(false);

        let gate = GitGate::new(&runner, &prompter, dir.path());
        let result = gate.ensure(ProjectType::Static).await;

        assert!(result.passed);
        assert_eq!(runner.count_calls("git", &["push"]), 0);
    }
}
