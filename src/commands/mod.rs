/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`     — Interactive chat with session switching
- `sessions` — List or delete conversations
- `history`  — Print a transcript

Handlers are small: they wire the HTTP backend and the session store into a
`ChatController` and print what it produces.
*/

// Terminal rendering shared by the handlers
pub mod display;

// Transcript printing
pub mod history;

// Session listing and deletion
pub mod sessions;

// Special commands parser for the chat loop
pub mod special_commands;

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Opens the remembered (or requested) session, prints its transcript,
    //! and runs a readline loop. Plain input is sent to the assistant;
    //! `/`-prefixed input manages sessions.

    use crate::api::HttpBackend;
    use crate::chat::{ChatController, SendOutcome};
    use crate::commands::display::{print_catalog, print_message, print_transcript};
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::config::Config;
    use crate::error::{Result, UnichatError};
    use crate::storage::SessionStore;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `store` - Current-session pointer store
    /// * `session` - Session id or prefix to open instead of the remembered one
    ///
    /// # Errors
    ///
    /// Returns error if the terminal or the session store fails; backend
    /// failures are shown to the user and the loop continues.
    pub async fn run_chat<S: SessionStore>(
        config: Config,
        store: S,
        session: Option<String>,
    ) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let backend = HttpBackend::new(&config.server)?;
        let mut controller = ChatController::new(backend, store, &config.chat);
        controller.start(session.as_deref()).await?;

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config);
        print_transcript(controller.state().transcript());
        show_error(&controller);

        loop {
            match rl.readline(&format!("{} ", "you>".cyan().bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {}
                        other => {
                            handle_special(&mut controller, other, config.chat.history_limit)
                                .await?;
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;
                    println!("{}", "...".dimmed());

                    match controller.send(trimmed).await? {
                        Some(SendOutcome::Replied) => {
                            if let Some(reply) = controller.state().transcript().messages.last() {
                                print_message(reply);
                            }
                            println!();
                        }
                        Some(SendOutcome::Failed) => show_error(&controller),
                        Some(SendOutcome::Discarded) | None => {}
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn handle_special<S: SessionStore>(
        controller: &mut ChatController<HttpBackend, S>,
        command: SpecialCommand,
        limit: usize,
    ) -> Result<()> {
        match command {
            SpecialCommand::NewSession => {
                let id = controller.new_session()?;
                println!("{}", format!("Started new conversation {}", id).green());
            }
            SpecialCommand::ListSessions => {
                if controller.refresh_catalog().await.is_ok() {
                    print_catalog(
                        controller.catalog(),
                        limit,
                        Some(controller.state().session_id()),
                    );
                }
            }
            SpecialCommand::SwitchSession(id) => match controller.switch_session(&id).await {
                Ok(()) => print_transcript(controller.state().transcript()),
                Err(e) => report_failure(&e),
            },
            SpecialCommand::DeleteSession(id) => match controller.delete_session(&id).await {
                Ok(()) => {
                    println!("{}", format!("Deleted conversation {}", id).green());
                    println!(
                        "{}",
                        format!("Current session: {}", controller.state().session_id()).dimmed()
                    );
                }
                Err(e) => report_failure(&e),
            },
            SpecialCommand::Reload => {
                if controller.reload_transcript().await.is_ok() {
                    print_transcript(controller.state().transcript());
                }
            }
            SpecialCommand::ShowStatus => print_status(controller),
            SpecialCommand::DismissError => {
                controller.dismiss_error();
                println!("{}", "Error dismissed.".dimmed());
            }
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }

        show_error(controller);
        Ok(())
    }

    /// Print non-network failures; network failures already sit in the error flag
    fn report_failure(error: &anyhow::Error) {
        if !matches!(
            error.downcast_ref::<UnichatError>(),
            Some(UnichatError::Backend { .. })
                | Some(UnichatError::Transport(_))
                | Some(UnichatError::Http(_))
        ) {
            eprintln!("{}", error.to_string().red());
        }
    }

    fn show_error<S: SessionStore>(controller: &ChatController<HttpBackend, S>) {
        if let Some(error) = controller.state().error() {
            eprintln!("{} {}", "error:".red().bold(), error);
            eprintln!("{}", "(type /dismiss to clear)".dimmed());
        }
    }

    fn print_status<S: SessionStore>(controller: &ChatController<HttpBackend, S>) {
        let state = controller.state();
        println!();
        println!("Session:  {}", state.session_id().cyan());
        println!("Title:    {}", state.title());
        println!("Messages: {}", state.transcript().len());
        println!("Model:    {}", controller.model());
        println!("Status:   {}", state.status());
        println!();
    }

    fn print_welcome_banner(config: &Config) {
        println!();
        println!("{}", "University Assistant".bold());
        println!("Connected to {}", config.server.base_url.cyan());
        println!("Type {} for commands, {} to leave.", "/help".cyan(), "exit".cyan());
    }
}
