//! Cloudflare Pages deployment via wrangler.

use super::{find_build_output, url, DeployAdapter, DeployContext, DeploymentResult};
use crate::gates::timeouts;
use crate::platform::PlatformId;
use async_trait::async_trait;
use tracing::info;

pub struct CloudflarePagesAdapter;

impl CloudflarePagesAdapter {
    /// Pages project names come from the directory name, lowercased with
    /// anything outside [a-z0-9-] collapsed to hyphens.
    fn project_name(ctx: &DeployContext<'_>) -> String {
        let raw = ctx
            .project_dir
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "site".to_string());
        let name: String = raw
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let trimmed = name.trim_matches('-');
        if trimmed.is_empty() {
            "site".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[async_trait]
impl DeployAdapter for CloudflarePagesAdapter {
    fn platform(&self) -> PlatformId {
        PlatformId::CloudflarePages
    }

    async fn deploy(&self, ctx: &DeployContext<'_>) -> DeploymentResult {
        let output_dir = find_build_output(ctx.project_dir).unwrap_or(".");
        let name = Self::project_name(ctx);
        info!(dir = output_dir, project = %name, "Deploying to Cloudflare Pages");

        let deploy = ctx
            .runner
            .run(
                "wrangler",
                &["pages", "deploy", output_dir, "--project-name", &name],
                ctx.project_dir,
                timeouts::DEPLOY,
            )
            .await;
        if !deploy.succeeded() {
            return DeploymentResult::failed(
                self.platform(),
                format!("wrangler deploy failed: {}", deploy.stderr.trim()),
            );
        }

        let live_url =
            url::extract_first_url_matching(r"https://[\w.-]+\.pages\.dev\S*", &deploy.stdout);
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
    async fn deploys_dist_when_present() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();
        let runner = MockRunner::new();
        runner.expect(
            "wrangler",
            &["pages", "deploy", "dist"],
            CommandOutcome::success("Deployment complete! https://myapp-8x1.pages.dev\n"),
        );
        let prompter = ScriptedPrompter::new();

        let result = CloudflarePagesAdapter
            .deploy(&ctx(&runner, &prompter, &dir))
            .await;

        assert!(result.success);
        assert_eq!(
            result.live_url.as_deref(),
            Some("https://myapp-8x1.pages.dev")
        );
    }

    #[tokio::test]
    async fn falls_back_to_project_root_without_build_output() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();

        let result = CloudflarePagesAdapter
            .deploy(&ctx(&runner, &prompter, &dir))
            .await;

        assert!(result.success);
        let call = &runner.invocations()[0];
        assert_eq!(call.args[2], ".");
        assert_eq!(call.args[3], "--project-name");
    }

    #[tokio::test]
    async fn wrangler_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new().with_default(CommandOutcome::failure(
            1,
            "",
            "Authentication error: not logged in",
        ));
        let prompter = ScriptedPrompter::new();

        let result = CloudflarePagesAdapter
            .deploy(&ctx(&runner, &prompter, &dir))
            .await;

        assert!(!result.success);
        assert!(result.diagnostic.unwrap().contains("Authentication"));
    }

    #[test]
    fn project_names_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("My Cool_App");
        fs::create_dir(&project).unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        let ctx = DeployContext {
            runner: &runner,
            prompter: &prompter,
            project_dir: &project,
            project_type: ProjectType::Static,
        };

        assert_eq!(CloudflarePagesAdapter::project_name(&ctx), "my-cool-app");
    }
}
