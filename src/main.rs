use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ba_genie::{AppConfig, Backend, Commands, Container, FallbackPolicy, Router};

#[derive(Parser)]
#[command(name = "ba-genie")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    /// Echo prompts instead of calling a model (same as --backend mock)
    #[arg(long, global = true)]
    mock_model: bool,

    #[arg(long, global = true)]
    region: Option<String>,

    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[arg(long, global = true)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Send earlier turns of the conversation with each request
    #[arg(long, global = true)]
    history: bool,

    /// What to show when the model fails: canned or error
    #[arg(long, global = true)]
    fallback: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if self.mock_model {
            config.backend = Backend::Mock;
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if self.history {
            config.include_history = true;
        }
        if let Some(fallback) = &self.fallback {
            config.fallback = fallback.parse::<FallbackPolicy>()?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config)?;

    if matches!(cli.command, Commands::Tasks) {
        config.backend = Backend::Mock;
    }

    let container = Container::new(config)?;
    let router = Router::new(&container);

    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn mock_model_flag_overrides_backend() {
        let cli = Cli::try_parse_from(["ba-genie", "--backend", "completion", "--mock-model", "tasks"])
            .unwrap();
        let mut config = AppConfig::default();
        cli.apply_to(&mut config).unwrap();
        assert_eq!(config.backend, Backend::Mock);
    }

    #[test]
    fn ask_accepts_task_and_exports() {
        let cli = Cli::try_parse_from([
            "ba-genie",
            "ask",
            "Summarize the meeting notes",
            "--task",
            "summarize",
            "--export-docx",
            "out.docx",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                task, export_docx, ..
            } => {
                assert_eq!(task.as_deref(), Some("summarize"));
                assert_eq!(export_docx, Some(PathBuf::from("out.docx")));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn unknown_fallback_is_rejected() {
        let cli = Cli::try_parse_from(["ba-genie", "--fallback", "retry", "tasks"]).unwrap();
        assert!(cli.apply_to(&mut AppConfig::default()).is_err());
    }
}
