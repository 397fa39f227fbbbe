//! Netlify deployment.
//!
//! Link state lives in `.netlify/state.json`; a site id there means the
//! directory is already wired to a Netlify site and `netlify init` can be
//! skipped. Initialization is interactive because the CLI walks the user
//! through team and site naming.

use super::{url, DeployAdapter, DeployContext, DeploymentResult};
use crate::gates::timeouts;
use crate::platform::PlatformId;
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info};

const SITE_URL_PATTERN: &str = r"https://[\w.-]+\.netlify\.app\S*";

pub struct NetlifyAdapter;

impl NetlifyAdapter {
    fn is_linked(ctx: &DeployContext<'_>) -> bool {
        let state = ctx.project_dir.join(".netlify").join("state.json");
        let Ok(contents) = fs::read_to_string(&state) else {
            return false;
        };
        match serde_json::from_str::<serde_json::Value>(&contents) {
            Ok(value) => value
                .get("siteId")
                .and_then(|id| id.as_str())
                .is_some_and(|id| !id.is_empty()),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl DeployAdapter for NetlifyAdapter {
    fn platform(&self) -> PlatformId {
        PlatformId::Netlify
    }

    async fn deploy(&self, ctx: &DeployContext<'_>) -> DeploymentResult {
        if !Self::is_linked(ctx) {
            info!("No linked Netlify site, running netlify init");
            let init = ctx
                .runner
                .run_interactive(
                    "netlify",
                    &["init", "--manual"],
                    ctx.project_dir,
                    timeouts::LOGIN,
                )
                .await;
            if !init.succeeded() {
                debug!("netlify init failed, trying login first");
                let login = ctx
                    .runner
                    .run_interactive("netlify", &["login"], ctx.project_dir, timeouts::LOGIN)
                    .await;
                if !login.succeeded() {
                    return DeploymentResult::failed(
                        self.platform(),
                        format!("Netlify login failed: {}", login.stderr.trim()),
                    );
                }
                let retry = ctx
                    .runner
                    .run_interactive(
                        "netlify",
                        &["init", "--manual"],
                        ctx.project_dir,
                        timeouts::LOGIN,
                    )
                    .await;
                if !retry.succeeded() {
                    return DeploymentResult::failed(
                        self.platform(),
                        format!("Could not link a Netlify site: {}", retry.stderr.trim()),
                    );
                }
            }
        }

        info!("Deploying to Netlify");
        let deploy = ctx
            .runner
            .run(
                "netlify",
                &["deploy", "--prod"],
                ctx.project_dir,
                timeouts::DEPLOY,
            )
            .await;
        if !deploy.succeeded() {
            return DeploymentResult::failed(
                self.platform(),
                format!("netlify deploy failed: {}", deploy.stderr.trim()),
            );
        }

        let live_url = deploy
            .stdout
            .lines()
            .filter(|line| {
                let lower = line.to_lowercase();
                lower.contains("unique url") || lower.contains("website url")
            })
            .find_map(|line| url::extract_first_url_matching(r"https://\S+", line))
            .or_else(|| url::extract_first_url_matching(SITE_URL_PATTERN, &deploy.stdout));

        DeploymentResult::succeeded(self.platform(), live_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutcome, MockRunner};
    use crate::interact::ScriptedPrompter;
    use crate::project::ProjectType;
    use std::fs;
    use tempfile::TempDir;

    fn link(dir: &TempDir) {
        let state_dir = dir.path().join(".netlify");
        fs::create_dir(&state_dir).unwrap();
        fs::write(
            state_dir.join("state.json"),
            r#"{"siteId": "0f1e2d3c-aaaa-bbbb-cccc-000011112222"}"#,
        )
        .unwrap();
    }

    fn ctx<'a>(
        runner: &'a MockRunner,
        prompter: &'a ScriptedPrompter,
        dir: &'a TempDir,
    ) -> DeployContext<'a> {
        DeployContext {
            runner,
            prompter,
            project_dir: dir.path(),
            project_type: ProjectType::Vite,
        }
    }

    #[tokio::test]
    async fn linked_site_skips_init() {
        let dir = TempDir::new().unwrap();
        link(&dir);
        let runner = MockRunner::new();
        runner.expect(
            "netlify",
            &["deploy", "--prod"],
            CommandOutcome::success(
                "Deploy path: dist\nWebsite URL: https://calm-otter-42.netlify.app\n",
            ),
        );
        let prompter = ScriptedPrompter::new();

        let result = NetlifyAdapter.deploy(&ctx(&runner, &prompter, &dir)).await;

        assert!(result.success);
        assert_eq!(
            result.live_url.as_deref(),
            Some("https://calm-otter-42.netlify.app")
        );
        assert_eq!(runner.count_calls("netlify", &["init"]), 0);
    }

    #[tokio::test]
    async fn unlinked_site_runs_init_first() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.expect(
            "netlify",
            &["deploy", "--prod"],
            CommandOutcome::success("Unique URL: https://deploy-preview.netlify.app\n"),
        );
        let prompter = ScriptedPrompter::new();

        let result = NetlifyAdapter.deploy(&ctx(&runner, &prompter, &dir)).await;

        assert!(result.success);
        assert_eq!(runner.count_calls("netlify", &["init", "--manual"]), 1);
        let init = &runner.invocations()[0];
        assert!(init.interactive);
    }

    #[tokio::test]
    async fn init_failure_falls_back_to_login() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.expect(
            "netlify",
            &["init", "--manual"],
            CommandOutcome::failure(1, "", "Not logged in"),
        );
        runner.expect("netlify", &["login"], CommandOutcome::success("Logged in"));
        runner.expect("netlify", &["init", "--manual"], CommandOutcome::success(""));
        runner.expect(
            "netlify",
            &["deploy", "--prod"],
            CommandOutcome::success("no url printed"),
        );
        let prompter = ScriptedPrompter::new();

        let result = NetlifyAdapter.deploy(&ctx(&runner, &prompter, &dir)).await;

        assert!(result.success);
        assert!(result.live_url.is_none());
        assert_eq!(runner.count_calls("netlify", &["login"]), 1);
    }

    #[tokio::test]
    async fn deploy_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        link(&dir);
        let runner = MockRunner::new();
        runner.expect(
            "netlify",
            &["deploy", "--prod"],
            CommandOutcome::failure(2, "", "Error: build directory does not exist"),
        );
        let prompter = ScriptedPrompter::new();

        let result = NetlifyAdapter.deploy(&ctx(&runner, &prompter, &dir)).await;

        assert!(!result.success);
        assert!(result.diagnostic.unwrap().contains("build directory"));
        assert!(result.live_url.is_none());
    }

    #[test]
    fn malformed_state_file_counts_as_unlinked() {
        let dir = TempDir::new().unwrap();
        let state_dir = dir.path().join(".netlify");
        fs::create_dir(&state_dir).unwrap();
        fs::write(state_dir.join("state.json"), "not json").unwrap();

        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        assert!(!NetlifyAdapter::is_linked(&ctx(&runner, &prompter, &dir)));
    }
}
