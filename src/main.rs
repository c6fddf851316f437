//! Unichat - terminal client for the university assistant
//!
#![doc = "Main entry point for the Unichat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use unichat::cli::{Cli, Commands};
use unichat::commands;
use unichat::config::Config;
use unichat::storage::FileSessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let store = match &cli.state_file {
        Some(path) => {
            tracing::info!("Using state file override: {}", path.display());
            FileSessionStore::new_with_path(path)?
        }
        None => FileSessionStore::new()?,
    };

    match cli.command {
        Commands::Chat { session, model: _ } => {
            if let Some(s) = &session {
                tracing::debug!("Opening requested session: {}", s);
            }
            commands::chat::run_chat(config, store, session).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting sessions command");
            commands::sessions::handle_sessions(&config, store, command).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, store, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they do not interleave with chat output.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "unichat=debug" } else { "unichat=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
