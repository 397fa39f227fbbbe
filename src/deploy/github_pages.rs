//! GitHub Pages deployment.
//!
//! There is no deploy CLI here. The adapter arranges the content GitHub
//! Pages can serve (a `docs/` directory when the project builds to
//! dist/build/out), then walks the user through enabling Pages in the
//! repository settings. The live URL depends on the user's account name, so
//! none is reported.

use super::{find_build_output, DeployAdapter, DeployContext, DeploymentResult};
use crate::platform::PlatformId;
use async_trait::async_trait;
use std::fs;
use tracing::info;

pub struct GitHubPagesAdapter;

const SETUP_STEPS: &str = "\
To finish publishing with GitHub Pages:
  1. Commit and push the serving folder: git add -A && git commit && git push
  2. Open your repository on GitHub and go to Settings > Pages
  3. Under 'Build and deployment', choose 'Deploy from a branch'
  4. Select branch 'main' and the folder shown above, then Save
  5. Your site will be live at https://<user>.github.io/<repo>/ shortly";

#[async_trait]
impl DeployAdapter for GitHubPagesAdapter {
    fn platform(&self) -> PlatformId {
        PlatformId::GitHubPages
    }

    /// Arranges servable content and prints the Pages setup steps. Pushing
    /// stays in the user's hands; the git gate already asked about it and
    /// this adapter must not override that answer.
    async fn deploy(&self, ctx: &DeployContext<'_>) -> DeploymentResult {
        let docs = ctx.project_dir.join("docs");
        let serve_folder = if docs.is_dir() {
            "/docs"
        } else if let Some(output) = find_build_output(ctx.project_dir) {
            if let Err(e) = fs::rename(ctx.project_dir.join(output), &docs) {
                return DeploymentResult::failed(
                    self.platform(),
                    format!("Could not move {} to docs/: {}", output, e),
                );
            }
            info!(from = output, "Moved build output to docs/ for Pages");
            "/docs"
        } else {
            "/ (root)"
        };

        ctx.prompter.acknowledge(&format!(
            "Serving folder: {}\n{}",
            serve_folder, SETUP_STEPS
        ));
        DeploymentResult::succeeded(self.platform(), None)
    }
}
