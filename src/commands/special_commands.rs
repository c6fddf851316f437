//! Special commands parser for interactive chat mode
//!
//! Special commands manage sessions instead of being sent to the assistant:
//! - Start a new conversation or switch to a previous one
//! - List and delete sessions
//! - Reload the transcript, show status, dismiss errors
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/`; the command word is case-insensitive,
//! arguments (session ids) are taken verbatim.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command does not take an argument
    #[error("Command {command} takes no argument (got: {arg})")]
    UnexpectedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a fresh conversation
    NewSession,

    /// Show the recent-conversations list
    ListSessions,

    /// Switch to another session by id or prefix
    SwitchSession(String),

    /// Delete a session by id or prefix
    DeleteSession(String),

    /// Re-fetch the active transcript from the backend
    Reload,

    /// Show the active session, title, and send status
    ShowStatus,

    /// Clear the current error message
    DismissError,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the input to the assistant
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognised `/command`,
/// `CommandError::MissingArgument` when `/switch` or `/delete` lack an id,
/// and `CommandError::UnexpectedArgument` when a bare command gets one.
///
/// # Examples
///
/// ```
/// use unichat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewSession);
/// assert_eq!(
///     parse_special_command("/switch 3fa85f64").unwrap(),
///     SpecialCommand::SwitchSession("3fa85f64".to_string())
/// );
/// assert_eq!(
///     parse_special_command("What are the library hours?").unwrap(),
///     SpecialCommand::None
/// );
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    let bare = |command: SpecialCommand| {
        if arg.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::UnexpectedArgument {
                command: word.clone(),
                arg: arg.to_string(),
            })
        }
    };

    let with_id = |make: fn(String) -> SpecialCommand, usage: &str| {
        if arg.is_empty() {
            Err(CommandError::MissingArgument {
                command: word.clone(),
                usage: usage.to_string(),
            })
        } else {
            Ok(make(arg.to_string()))
        }
    };

    match word.as_str() {
        "/new" => bare(SpecialCommand::NewSession),
        "/sessions" | "/history" => bare(SpecialCommand::ListSessions),
        "/switch" | "/open" => with_id(SpecialCommand::SwitchSession, "/switch <session-id>"),
        "/delete" => with_id(SpecialCommand::DeleteSession, "/delete <session-id>"),
        "/reload" => bare(SpecialCommand::Reload),
        "/status" => bare(SpecialCommand::ShowStatus),
        "/dismiss" => bare(SpecialCommand::DismissError),
        "/help" | "/?" => bare(SpecialCommand::Help),
        "/exit" | "/quit" => bare(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands
================

SESSIONS:
  /new              - Start a new conversation
  /sessions         - List recent conversations
  /switch <id>      - Open a previous conversation (id or unique prefix)
  /delete <id>      - Delete a conversation
  /reload           - Re-fetch the current conversation

STATUS:
  /status           - Show the current session and send status
  /dismiss          - Clear the last error message
  /help, /?         - Show this help message

SESSION CONTROL:
  exit, quit        - Exit interactive mode

NOTES:
  - Commands are case-insensitive; session ids are not
  - Everything else you type is sent to the assistant
"#
    );
}
