use crate::api::HttpBackend;
use crate::chat::ChatController;
use crate::cli::SessionCommand;
use crate::commands::display::print_catalog;
use crate::config::Config;
use crate::error::Result;
use crate::storage::SessionStore;
use colored::Colorize;

/// Handle session commands
pub async fn handle_sessions<S: SessionStore>(
    config: &Config,
    store: S,
    command: SessionCommand,
) -> Result<()> {
    let backend = HttpBackend::new(&config.server)?;
    let mut controller = ChatController::new(backend, store, &config.chat);
    controller.refresh_catalog().await?;

    match command {
        SessionCommand::List { limit, json } => {
            let limit = limit.unwrap_or(config.chat.history_limit);
            if json {
                let rows: Vec<_> = controller.catalog().iter().take(limit).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                let active = controller.remembered_session()?;
                print_catalog(controller.catalog(), limit, active.as_deref());
                println!(
                    "Use {} to continue a conversation.",
                    "unichat chat --session <ID>".cyan()
                );
                println!();
            }
        }
        SessionCommand::Delete { id } => {
            let session_id = controller.resolve_session(&id)?;
            controller.delete_session(&session_id).await?;
            println!("{}", format!("Deleted conversation {}", session_id).green());
        }
    }

    Ok(())
}
