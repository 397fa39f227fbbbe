//! Project-type classification
//!
//! Two-path classification: a prediction backend is consulted first when one
//! is configured, with a deterministic filesystem inspection as the fallback.
//! The AI path's only failure mode is "did not produce a usable answer" —
//! malformed output, network errors and unrecognized tags all fall through
//! silently to the deterministic path.
//!
//! The deterministic path is a pure function of the directory listing and
//! manifest contents, in priority order: package.json dependency markers
//! (next, vite, react), then `index.html`, then `requirements.txt`.

use crate::ai::{extract_json_lenient, PredictionBackend};
use crate::project::types::ProjectType;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct ClassificationResponse {
    #[serde(rename = "type")]
    project_type: String,
    #[serde(default)]
    reason: String,
}

/// Classifies a project directory into a [`ProjectType`].
///
/// Holds the backend for this run explicitly; there is no global model
/// state. Classification is idempotent and side-effect-free beyond
/// read-only filesystem inspection.
pub struct ProjectClassifier {
    backend: Option<Arc<dyn PredictionBackend>>,
}

impl ProjectClassifier {
    pub fn new(backend: Option<Arc<dyn PredictionBackend>>) -> Self {
        Self { backend }
    }

    /// Classifies `project_dir`, preferring the AI path when a backend is
    /// configured.
    pub async fn classify(&self, project_dir: &Path) -> ProjectType {
        if let Some(backend) = &self.backend {
            if let Some(project_type) = self.classify_with_backend(backend, project_dir).await {
                return project_type;
            }
            info!("Falling back to deterministic detection");
        }

        Self::classify_deterministic(project_dir)
    }

    async fn classify_with_backend(
        &self,
        backend: &Arc<dyn PredictionBackend>,
        project_dir: &Path,
    ) -> Option<ProjectType> {
        let (files, folders) = top_level_listing(project_dir);

        let prompt = format!(
            "You are an expert DevOps assistant. Based on these files: {} and folders: {}, \
             detect the web project type. Possible types: nextjs, vite, react, static, \
             python-flask, or unknown. \
             Respond in JSON format: {{\"type\": \"...\", \"reason\": \"...\"}}.",
            files.join(", "),
            folders.join(", "),
        );

        let response = match backend.complete(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "Project detection failed");
                return None;
            }
        };

        let json = extract_json_lenient(&response)?;
        let parsed: ClassificationResponse = match serde_json::from_str(&json) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Unparseable classification response");
                return None;
            }
        };

        match parsed.project_type.parse::<ProjectType>() {
            Ok(project_type) => {
                info!(%project_type, reason = %parsed.reason, "Project type detected");
                Some(project_type)
            }
            Err(()) => {
                warn!(tag = %parsed.project_type, "Backend returned unrecognized project type");
                None
            }
        }
    }

    /// Deterministic fallback: same inputs, same answer.
    pub fn classify_deterministic(project_dir: &Path) -> ProjectType {
        let (files, _) = top_level_listing(project_dir);

        if files.iter().any(|f| f == "package.json") {
            if let Some(project_type) = classify_from_manifest(&project_dir.join("package.json")) {
                return project_type;
            }
        }

        if files.iter().any(|f| f == "index.html") {
            return ProjectType::Static;
        }

        if files.iter().any(|f| f == "requirements.txt") {
            return ProjectType::PythonServer;
        }

        ProjectType::Unknown
    }
}

/// Reads a package.json and maps known dependency markers to a type.
/// Malformed JSON means "no answer from the manifest", letting the
/// static-entry and server-manifest checks run.
fn classify_from_manifest(manifest_path: &Path) -> Option<ProjectType> {
    let content = fs::read_to_string(manifest_path).ok()?;
    let manifest: serde_json::Value = match serde_json::from_str(&content) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!(path = %manifest_path.display(), error = %e, "Malformed package.json");
            return None;
        }
    };

    let has_dep = |section: &str, name: &str| {
        manifest
            .get(section)
            .and_then(|deps| deps.get(name))
            .is_some()
    };

    if has_dep("dependencies", "next") {
        Some(ProjectType::NextJs)
    } else if has_dep("devDependencies", "vite") {
        Some(ProjectType::Vite)
    } else if has_dep("dependencies", "react") {
        Some(ProjectType::React)
    } else {
        None
    }
}

/// Sorted names of top-level files and directories.
fn top_level_listing(dir: &Path) -> (Vec<String>, Vec<String>) {
    let mut files = Vec::new();
    let mut folders = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => folders.push(name),
                Ok(_) => files.push(name),
                Err(_) => {}
            }
        }
    }

    files.sort();
    folders.sort();
    (files, folders)
}
