//! Command-line interface definition for Unichat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, session browsing, and
//! transcript display.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Unichat - terminal client for the university assistant
///
/// Chat with the assistant backend, browse past conversations, and
/// switch between them.
#[derive(Parser, Debug, Clone)]
#[command(name = "unichat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the backend base URL from config
    #[arg(long)]
    pub base_url: Option<String>,

    /// File holding the current-session pointer
    #[arg(long, env = "UNICHAT_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Unichat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat
    Chat {
        /// Session to open instead of the remembered one (id or prefix)
        #[arg(short, long)]
        session: Option<String>,

        /// Model name to send with messages
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Browse and manage conversation sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Show conversation transcripts
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions, most recently active first
    List {
        /// Maximum number of rows (defaults to chat.history_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a session and its history
    Delete {
        /// Session id or unique prefix
        id: String,
    },
}

/// Transcript subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// Print the transcript of a session
    Show {
        /// Session id or unique prefix (defaults to the current session)
        id: Option<String>,

        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
