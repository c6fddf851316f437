use crate::api::HttpBackend;
use crate::chat::ChatController;
use crate::cli::HistoryCommand;
use crate::commands::display::print_transcript;
use crate::config::Config;
use crate::error::Result;
use crate::storage::SessionStore;
use colored::Colorize;

/// Handle history commands
pub async fn handle_history<S: SessionStore>(
    config: &Config,
    store: S,
    command: HistoryCommand,
) -> Result<()> {
    let backend = HttpBackend::new(&config.server)?;
    let mut controller = ChatController::new(backend, store, &config.chat);

    match command {
        HistoryCommand::Show { id, json } => {
            let session_id = match id {
                Some(id) => {
                    controller.refresh_catalog().await?;
                    controller.resolve_session(&id)?
                }
                None => match controller.remembered_session()? {
                    Some(current) => current,
                    None => {
                        println!(
                            "{}",
                            "No current session. Start one with `unichat chat`.".yellow()
                        );
                        return Ok(());
                    }
                },
            };

            let transcript = controller.load_transcript(&session_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            } else {
                print_transcript(&transcript);
            }
        }
    }

    Ok(())
}
