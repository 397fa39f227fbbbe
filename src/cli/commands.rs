use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI-assisted deployment pipeline for web projects
#[derive(Parser, Debug)]
#[command(
    name = "skiff",
    about = "AI-assisted deployment pipeline for web projects",
    version,
    author,
    long_about = "skiff inspects a project directory to work out what kind of app it is, \
                  recommends a free hosting platform, checks that the platform's CLI and \
                  your repository are ready, builds the project, and drives the platform's \
                  own tooling to put it live. An Ollama model sharpens classification and \
                  recommendation when one is running; everything works without it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Classify, prepare, and deploy a project",
        long_about = "Runs the full pipeline on a project directory.\n\n\
                      Examples:\n  \
                      skiff deploy\n  \
                      skiff deploy /path/to/project\n  \
                      skiff deploy --no-ai\n  \
                      skiff deploy --model mistral:7b"
    )]
    Deploy(DeployArgs),

    #[command(
        about = "Check AI backend availability",
        long_about = "Probes the configured Ollama endpoint and reports whether AI-assisted \
                      analysis is available.\n\n\
                      Examples:\n  \
                      skiff health\n  \
                      skiff health --endpoint http://ollama.lan:11434"
    )]
    Health(HealthArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DeployArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Ollama model to use (e.g., 'llama3.1:8b')"
    )]
    pub model: Option<String>,

    #[arg(long, value_name = "URL", help = "Ollama endpoint URL")]
    pub endpoint: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "AI request timeout in seconds"
    )]
    pub timeout: Option<u64>,

    #[arg(long, help = "Skip the AI backend and use deterministic analysis only")]
    pub no_ai: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
    #[arg(long, value_name = "URL", help = "Ollama endpoint URL")]
    pub endpoint: Option<String>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model to report on")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_deploy() {
        let args = CliArgs::parse_from(["skiff", "deploy"]);
        match args.command {
            Commands::Deploy(deploy) => {
                assert!(deploy.project_path.is_none());
                assert!(!deploy.no_ai);
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn parses_deploy_with_options() {
        let args = CliArgs::parse_from([
            "skiff",
            "deploy",
            "/tmp/site",
            "--no-ai",
            "--model",
            "mistral:7b",
            "--timeout",
            "45",
        ]);
        match args.command {
            Commands::Deploy(deploy) => {
                assert_eq!(deploy.project_path.unwrap(), PathBuf::from("/tmp/site"));
                assert!(deploy.no_ai);
                assert_eq!(deploy.model.as_deref(), Some("mistral:7b"));
                assert_eq!(deploy.timeout, Some(45));
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn parses_health_with_endpoint() {
        let args = CliArgs::parse_from(["skiff", "health", "--endpoint", "http://ollama:11434"]);
        match args.command {
            Commands::Health(health) => {
                assert_eq!(health.endpoint.as_deref(), Some("http://ollama:11434"));
            }
            _ => panic!("expected health"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = CliArgs::try_parse_from(["skiff", "-v", "-q", "health"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_log_level_is_accepted_after_subcommand() {
        let args = CliArgs::parse_from(["skiff", "deploy", "--log-level", "debug"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
