//! Platform deployment adapters
//!
//! One adapter per hosting platform, all behind the [`DeployAdapter`] trait.
//! Adapters drive the platform's own CLI through the injected command runner
//! and never invent a live URL: any URL in a [`DeploymentResult`] was scraped
//! from captured CLI output by [`url::extract_first_url_matching`].

pub mod cloudflare;
pub mod github_pages;
pub mod netlify;
pub mod render;
pub mod url;
pub mod vercel;

use crate::exec::CommandRunner;
use crate::interact::Prompter;
use crate::platform::PlatformId;
use crate::project::ProjectType;
use async_trait::async_trait;
use std::path::Path;

pub use cloudflare::CloudflarePagesAdapter;
pub use github_pages::GitHubPagesAdapter;
pub use netlify::NetlifyAdapter;
pub use render::RenderAdapter;
pub use vercel::VercelAdapter;

/// Everything an adapter needs to act on a project.
pub struct DeployContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    pub project_dir: &'a Path,
    pub project_type: ProjectType,
}

/// Terminal outcome of one deployment attempt.
#[derive(Debug, Clone)]
pub struct DeploymentResult {
    pub platform: PlatformId,
    pub success: bool,
    /// Scraped from CLI output; `None` when the platform prints no URL or
    /// the deployment is completed manually by the user.
    pub live_url: Option<String>,
    pub diagnostic: Option<String>,
}

impl DeploymentResult {
    pub fn succeeded(platform: PlatformId, live_url: Option<String>) -> Self {
        Self {
            platform,
            success: true,
            live_url,
            diagnostic: None,
        }
    }

    pub fn failed(platform: PlatformId, diagnostic: impl Into<String>) -> Self {
        Self {
            platform,
            success: false,
            live_url: None,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

#[async_trait]
pub trait DeployAdapter: Send + Sync {
    fn platform(&self) -> PlatformId;

    async fn deploy(&self, ctx: &DeployContext<'_>) -> DeploymentResult;
}

/// Adapter lookup, total over the supported platforms.
pub fn adapter_for(platform: PlatformId) -> Box<dyn DeployAdapter> {
    match platform {
        PlatformId::Netlify => Box::new(NetlifyAdapter),
        PlatformId::Vercel => Box::new(VercelAdapter),
        PlatformId::GitHubPages => Box::new(GitHubPagesAdapter),
        PlatformId::CloudflarePages => Box::new(CloudflarePagesAdapter),
        PlatformId::Render => Box::new(RenderAdapter),
    }
}

/// First of the conventional build output directories that exists under
/// `project_dir`, if any.
pub(crate) fn find_build_output(project_dir: &Path) -> Option<&'static str> {
    ["dist", "build", "out"]
        .into_iter()
        .find(|dir| project_dir.join(dir).is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn adapter_lookup_is_total() {
        for platform in PlatformId::ALL {
            assert_eq!(adapter_for(platform).platform(), platform);
        }
    }

    #[test]
    fn build_output_prefers_dist() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();

        assert_eq!(find_build_output(dir.path()), Some("dist"));
    }

    #[test]
    fn build_output_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_build_output(dir.path()), None);
    }
}
