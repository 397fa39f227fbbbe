//! Render deployment.
//!
//! Render deploys from the connected repository on its own; the adapter's
//! job is to tell the user how to create the right service type. Python
//! projects (detected by `requirements.txt`) become web services, anything
//! else a static site.

use super::{DeployAdapter, DeployContext, DeploymentResult};
use crate::platform::PlatformId;
use async_trait::async_trait;

const PYTHON_SERVICE_STEPS: &str = "\
To deploy on Render:
  1. Go to https://dashboard.render.com and click 'New > Web Service'
  2. Connect the GitHub repository you just pushed
  3. Build command: pip install -r requirements.txt
  4. Start command: gunicorn app:app
  5. Choose the Free instance type and create the service";

const STATIC_SITE_STEPS: &str = "\
To deploy on Render:
  1. Go to https://dashboard.render.com and click 'New > Static Site'
  2. Connect the GitHub repository you just pushed
  3. Set the publish directory to your build output (dist, build, or .)
  4. Create the site; Render redeploys on every push";

pub struct RenderAdapter;

#[async_trait]
impl DeployAdapter for RenderAdapter {
    fn platform(&self) -> PlatformId {
        PlatformId::Render
    }

    async fn deploy(&self, ctx: &DeployContext<'_>) -> DeploymentResult {
        let steps = if ctx.project_dir.join("requirements.txt").exists() {
            PYTHON_SERVICE_STEPS
        } else {
            STATIC_SITE_STEPS
        };
        ctx.prompter.acknowledge(steps);
        DeploymentResult::succeeded(self.platform(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::MockRunner;
    use crate::interact::ScriptedPrompter;
    use crate::project::ProjectType;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn python_project_gets_web_service_steps() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        let ctx = DeployContext {
            runner: &runner,
            prompter: &prompter,
            project_dir: dir.path(),
            project_type: ProjectType::PythonServer,
        };

        let result = RenderAdapter.deploy(&ctx).await;

        assert!(result.success);
        assert!(result.live_url.is_none());
        assert!(prompter.questions().iter().any(|q| q.contains("gunicorn")));
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn static_project_gets_static_site_steps() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let prompter = ScriptedPrompter::new();
        let ctx = DeployContext {
            runner: &runner,
            prompter: &prompter,
            project_dir: dir.path(),
            project_type: ProjectType::Static,
        };

        let result = RenderAdapter.deploy(&ctx).await;

        assert!(result.success);
        assert!(prompter.questions().iter().any(|q| q.contains("Static Site")));
    }
}
