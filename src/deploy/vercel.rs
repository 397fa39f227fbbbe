//! Vercel deployment.
//!
//! Auth is probed with `vercel whoami`; login happens at most once, with
//! consent, through the interactive runner because the CLI opens a browser
//! flow. Flask projects get the serverless entrypoint Vercel expects:
//! `api/index.py` mirroring `app.py`.

use super::{url, DeployAdapter, DeployContext, DeploymentResult};
use crate::gates::timeouts;
use crate::platform::PlatformId;
use crate::project::ProjectType;
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info};

pub struct VercelAdapter;

impl VercelAdapter {
    /// Writes `api/index.py` from `app.py` when neither step has happened
    /// yet. Existing files are left alone.
    fn scaffold_python_entrypoint(ctx: &DeployContext<'_>) -> std::io::Result<()> {
        let entrypoint = ctx.project_dir.join("api").join("index.py");
        if entrypoint.exists() {
            return Ok(());
        }
        let app = ctx.project_dir.join("app.py");
        if !app.exists() {
            debug!("No app.py to mirror into api/index.py");
            return Ok(());
        }
        fs::create_dir_all(ctx.project_dir.join("api"))?;
        fs::copy(&app, &entrypoint)?;
        info!("Created api/index.py for Vercel's python runtime");
        Ok(())
    }
}

#[async_trait]
impl DeployAdapter for VercelAdapter {
    fn platform(&self) -> PlatformId {
        PlatformId::Vercel
    }

    async fn deploy(&self, ctx: &DeployContext<'_>) -> DeploymentResult {
        let whoami = ctx
            .runner
            .run("vercel", &["whoami"], ctx.project_dir, timeouts::PROBE)
            .await;
        if !whoami.succeeded() {
            if !ctx
                .prompter
                .confirm("You're not logged in to Vercel. Log in now?")
            {
                return DeploymentResult::failed(
                    self.platform(),
                    "Vercel login required; run `vercel login` and deploy again",
                );
            }
            let login = ctx
                .runner
                .run_interactive("vercel", &["login"], ctx.project_dir, timeouts::LOGIN)
                .await;
            if !login.succeeded() {
                return DeploymentResult::failed(
                    self.platform(),
                    format!("Vercel login failed: {}", login.stderr.trim()),
                );
            }
        }

        if ctx.project_type == ProjectType::PythonServer {
            if let Err(e) = Self::scaffold_python_entrypoint(ctx) {
                return DeploymentResult::failed(
                    self.platform(),
                    format!("Could not prepare api/index.py: {}", e),
                );
            }
        }

        if !ctx.project_dir.join(".vercel").join("project.json").exists() {
            info!("Project not linked yet; the CLI will prompt during deploy");
        }

        info!("Deploying to Vercel");
        let deploy = ctx
            .runner
            .run(
                "vercel",
                &["--prod", "--yes"],
                ctx.project_dir,
                timeouts::DEPLOY,
            )
            .await;
        if !deploy.succeeded() {
            return DeploymentResult::failed(
                self.platform(),
                format!("vercel deploy failed: {}", deploy.stderr.trim()),
            );
        }

        // The CLI prints the production URL on its own line.
        let live_url = url::first_https_line(&deploy.stdout)
            .or_else(|| url::first_https_line(&deploy.stderr));
        DeploymentResult::succeeded(self.platform(), live_url)
    }
}
