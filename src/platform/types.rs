//! Hosting platform identifiers and their CLI requirements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported hosting targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformId {
    Netlify,
    Vercel,
    GitHubPages,
    CloudflarePages,
    Render,
}

/// How a platform CLI gets installed when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Global npm package, installable with consent.
    Npm { package: &'static str },
    /// Manual download; the gate blocks for an acknowledgment instead.
    Manual { url: &'static str },
}

/// The CLI tool a platform's adapter depends on.
#[derive(Debug, Clone, Copy)]
pub struct CliRequirement {
    pub command: &'static str,
    pub install: InstallMethod,
}

impl PlatformId {
    pub const ALL: [PlatformId; 5] = [
        PlatformId::Netlify,
        PlatformId::Vercel,
        PlatformId::GitHubPages,
        PlatformId::CloudflarePages,
        PlatformId::Render,
    ];

    /// CLI tool required before this platform's adapter can run.
    /// Render deploys through its dashboard and needs no CLI.
    pub fn cli_requirement(&self) -> Option<CliRequirement> {
        match self {
            PlatformId::Netlify => Some(CliRequirement {
                command: "netlify",
                install: InstallMethod::Npm {
                    package: "netlify-cli",
                },
            }),
            PlatformId::Vercel => Some(CliRequirement {
                command: "vercel",
                install: InstallMethod::Npm { package: "vercel" },
            }),
            PlatformId::CloudflarePages => Some(CliRequirement {
                command: "wrangler",
                install: InstallMethod::Npm { package: "wrangler" },
            }),
            PlatformId::GitHubPages => Some(CliRequirement {
                command: "git",
                install: InstallMethod::Manual {
                    url: "https://git-scm.com/downloads",
                },
            }),
            PlatformId::Render => None,
        }
    }

    /// Platforms whose adapter deploys from a remotely-hosted repository.
    pub fn requires_remote_repo(&self) -> bool {
        matches!(self, PlatformId::GitHubPages | PlatformId::Render)
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformId::Netlify => "Netlify",
            PlatformId::Vercel => "Vercel",
            PlatformId::GitHubPages => "GitHub Pages",
            PlatformId::CloudflarePages => "Cloudflare Pages",
            PlatformId::Render => "Render",
        };
        f.write_str(name)
    }
}

impl FromStr for PlatformId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "netlify" => Ok(PlatformId::Netlify),
            "vercel" => Ok(PlatformId::Vercel),
            "githubpages" | "github" => Ok(PlatformId::GitHubPages),
            "cloudflarepages" | "cloudflare" => Ok(PlatformId::CloudflarePages),
            "render" => Ok(PlatformId::Render),
            _ => Err(()),
        }
    }
}

/// A platform recommendation with its rationale and setup steps.
///
/// Produced once per run; replaced at most once when the user declines a
/// platform that may require payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRecommendation {
    pub platform: PlatformId,
    pub reason: String,
    pub setup_steps: Vec<String>,
}
