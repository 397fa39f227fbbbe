//! Platform recommendation
//!
//! Mirrors the classifier's two-path structure: an AI-assisted
//! recommendation parsed leniently, backed by a total static lookup table.
//! The table covers every [`ProjectType`] including Unknown, with Vercel as
//! the final default, so `recommend` can never fail. It is safe to call
//! repeatedly in one run; the readiness gate calls it a second time when the
//! user declines a platform that may require payment.

use crate::ai::{extract_json_lenient, PredictionBackend};
use crate::platform::types::{PlatformId, PlatformRecommendation};
use crate::project::ProjectType;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RecommendationResponse {
    platform: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    setup_steps: Vec<String>,
}

/// Recommends a hosting platform for a classified project.
pub struct PlatformAdvisor {
    backend: Option<Arc<dyn PredictionBackend>>,
}

impl PlatformAdvisor {
    pub fn new(backend: Option<Arc<dyn PredictionBackend>>) -> Self {
        Self { backend }
    }

    /// Returns a recommendation; never fails.
    pub async fn recommend(&self, project_type: ProjectType) -> PlatformRecommendation {
        if let Some(backend) = &self.backend {
            if let Some(recommendation) = self.recommend_with_backend(backend, project_type).await {
                return recommendation;
            }
            info!("Falling back to default recommendations");
        }

        Self::fallback_recommendation(project_type)
    }

    async fn recommend_with_backend(
        &self,
        backend: &Arc<dyn PredictionBackend>,
        project_type: ProjectType,
    ) -> Option<PlatformRecommendation> {
        let prompt = format!(
            "You are an expert DevOps assistant. Recommend the best free hosting platform \
             for a {} project. Options: Netlify, Vercel, GitHub Pages, Cloudflare Pages, Render. \
             Respond in JSON format: {{\"platform\": \"...\", \"reason\": \"...\", \
             \"setup_steps\": [\"step1\", \"step2\"]}}",
            project_type,
        );

        let response = match backend.complete(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "Platform recommendation failed");
                return None;
            }
        };

        let json = extract_json_lenient(&response)?;
        let parsed: RecommendationResponse = match serde_json::from_str(&json) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Unparseable recommendation response");
                return None;
            }
        };

        let platform = match parsed.platform.parse::<PlatformId>() {
            Ok(platform) => platform,
            Err(()) => {
                warn!(platform = %parsed.platform, "Backend recommended unsupported platform");
                return None;
            }
        };

        info!(%platform, reason = %parsed.reason, "Platform recommended");
        Some(PlatformRecommendation {
            platform,
            reason: parsed.reason,
            setup_steps: parsed.setup_steps,
        })
    }

    /// Static lookup table, total over all project types.
    pub fn fallback_recommendation(project_type: ProjectType) -> PlatformRecommendation {
        match project_type {
            ProjectType::NextJs => PlatformRecommendation {
                platform: PlatformId::Vercel,
                reason: "Vercel is the creators of Next.js and provides the best hosting experience"
                    .to_string(),
                setup_steps: vec![
                    "Install Vercel CLI: npm install -g vercel".to_string(),
                    "Login to Vercel: vercel login".to_string(),
                    "Deploy: vercel --prod".to_string(),
                ],
            },
            ProjectType::Vite => PlatformRecommendation {
                platform: PlatformId::Netlify,
                reason: "Netlify provides excellent support for modern static sites built with Vite"
                    .to_string(),
                setup_steps: vec![
                    "Install Netlify CLI: npm install -g netlify-cli".to_string(),
                    "Login to Netlify: netlify login".to_string(),
                    "Deploy: netlify deploy --prod".to_string(),
                ],
            },
            ProjectType::React => PlatformRecommendation {
                platform: PlatformId::Netlify,
                reason: "Netlify offers great React support with automatic builds and deployments"
                    .to_string(),
                setup_steps: vec![
                    "Install Netlify CLI: npm install -g netlify-cli".to_string(),
                    "Login to Netlify: netlify login".to_string(),
                    "Deploy: netlify deploy --prod".to_string(),
                ],
            },
            ProjectType::Static => PlatformRecommendation {
                platform: PlatformId::GitHubPages,
                reason: "GitHub Pages is perfect for static sites with no build requirements"
                    .to_string(),
                setup_steps: vec![
                    "Ensure your site is in a GitHub repository".to_string(),
                    "Go to repository Settings > Pages".to_string(),
                    "Select source branch and folder".to_string(),
                    "Push to GitHub to deploy".to_string(),
                ],
            },
            ProjectType::PythonServer => PlatformRecommendation {
                platform: PlatformId::Vercel,
                reason: "Vercel provides excellent support for Python web applications with easy deployment"
                    .to_string(),
                setup_steps: vec![
                    "Install Vercel CLI: npm install -g vercel".to_string(),
                    "Login to Vercel: vercel login".to_string(),
                    "Deploy: vercel --prod".to_string(),
                ],
            },
            ProjectType::Unknown => PlatformRecommendation {
                platform: PlatformId::Vercel,
                reason: "Vercel supports most web frameworks and provides a great developer experience"
                    .to_string(),
                setup_steps: vec![
                    "Install Vercel CLI: npm install -g vercel".to_string(),
                    "Login to Vercel: vercel login".to_string(),
                    "Deploy: vercel --prod".to_string(),
                ],
            },
        }
    }
}
