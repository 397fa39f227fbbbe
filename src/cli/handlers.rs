//! Command handlers: wire configuration and collaborators together, run the
//! pipeline, and translate the result to an exit code.

use crate::ai::{OllamaBackend, PredictionBackend};
use anyhow::Context;
use crate::cli::commands::{DeployArgs, HealthArgs};
use crate::config::SkiffConfig;
use crate::exec::SystemRunner;
use crate::interact::TerminalPrompter;
use crate::pipeline::{DeploymentReport, Orchestrator};
use crate::platform::PlatformAdvisor;
use crate::project::ProjectClassifier;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn config_for_deploy(args: &DeployArgs) -> SkiffConfig {
    SkiffConfig::load_dotenv();
    let mut config = SkiffConfig::default();
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.ollama_endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    config.no_ai = args.no_ai;
    config
}

pub async fn handle_deploy(args: &DeployArgs, quiet: bool) -> i32 {
    let config = config_for_deploy(args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return EXIT_USAGE;
    }

    let project_dir = match resolve_project_dir(args.project_path.clone()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_USAGE;
        }
    };

    let backend = config.create_backend().await;
    let classifier = ProjectClassifier::new(backend.clone());
    let advisor = PlatformAdvisor::new(backend);

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(SystemRunner),
        Arc::new(TerminalPrompter),
        classifier,
        advisor,
    ));

    // Spawned so a panicking collaborator surfaces as a failed report
    // instead of taking the process down mid-deploy.
    let run = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let dir = project_dir.clone();
        async move { orchestrator.run(dir).await }
    });
    let report = match run.await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Pipeline aborted");
            DeploymentReport::aborted("Internal error; rerun with --log-level debug for details")
        }
    };

    if !quiet {
        print_report(&report);
    }

    if report.succeeded() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

pub async fn handle_health(args: &HealthArgs) -> i32 {
    SkiffConfig::load_dotenv();
    let mut config = SkiffConfig::default();
    if let Some(endpoint) = &args.endpoint {
        config.ollama_endpoint = endpoint.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }

    let backend = OllamaBackend::with_timeout(
        config.ollama_endpoint.clone(),
        config.model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );

    match backend.health_check().await {
        Ok(true) => {
            println!(
                "ollama: ok ({}, model {})",
                config.ollama_endpoint, config.model
            );
            EXIT_SUCCESS
        }
        Ok(false) => {
            println!("ollama: unreachable at {}", config.ollama_endpoint);
            println!("Deployments still work; analysis falls back to file inspection.");
            EXIT_FAILURE
        }
        Err(e) => {
            println!("ollama: error ({})", e);
            EXIT_FAILURE
        }
    }
}

fn resolve_project_dir(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let dir = match path {
        Some(path) => path,
        None => std::env::current_dir().context("Could not determine the current directory")?,
    };
    if !dir.is_dir() {
        anyhow::bail!("'{}' is not a directory", dir.display());
    }
    info!(dir = %dir.display(), "Using project directory");
    Ok(dir)
}

fn print_report(report: &DeploymentReport) {
    println!();
    println!("Project type: {}", report.project_type);
    if let Some(recommendation) = &report.recommendation {
        println!("Platform:     {}", recommendation.platform);
        println!("Why:          {}", recommendation.reason);
    }

    match &report.deployment {
        Some(deployment) if deployment.success => match &deployment.live_url {
            Some(url) => println!("\nDeployed: {}", url),
            None => println!("\nDeployment prepared; follow the printed steps to go live."),
        },
        _ => {
            let reason = report
                .failure
                .as_deref()
                .unwrap_or("Deployment did not complete");
            println!("\nStopped at {} stage: {}", report.stage_reached, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_a_usage_error() {
        let result = resolve_project_dir(Some(PathBuf::from("/no/such/dir/skiff-test")));
        assert!(result.is_err());
    }

    #[test]
    fn existing_directory_is_accepted() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve_project_dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[tokio::test]
    async fn health_fails_when_ollama_is_unreachable() {
        // Port 9 (discard) refuses immediately; no daemon to reach.
        let args = HealthArgs {
            endpoint: Some("http://127.0.0.1:9".to_string()),
            model: None,
        };

        assert_eq!(handle_health(&args).await, EXIT_FAILURE);
    }

    #[test]
    fn deploy_args_override_config() {
        let args = DeployArgs {
            project_path: None,
            model: Some("mistral:7b".to_string()),
            endpoint: Some("http://ollama.lan:11434".to_string()),
            timeout: Some(90),
            no_ai: true,
        };

        let config = config_for_deploy(&args);
        assert_eq!(config.model, "mistral:7b");
        assert_eq!(config.ollama_endpoint, "http://ollama.lan:11434");
        assert_eq!(config.request_timeout_secs, 90);
        assert!(config.no_ai);
    }
}
