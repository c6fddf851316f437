//! Unichat - terminal client for the university assistant
//!
//! This library provides the pieces behind the `unichat` binary: pure
//! history reconciliation, the backend interface, the live chat state
//! machine, and the CLI command handlers.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `history`: Transcript and session-catalog builders over flat history records
//! - `api`: Backend trait, wire payloads, and the reqwest implementation
//! - `chat`: Send/receive state machine and the session-switching controller
//! - `storage`: Current-session pointer persistence
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use unichat::history::{build_catalog, build_transcript, HistoryRecord};
//!
//! let record = |id, query: &str, reply: Option<&str>, minute| HistoryRecord {
//!     id,
//!     session_id: "a".to_string(),
//!     user_query: query.to_string(),
//!     bot_response: reply.map(str::to_string),
//!     model_used: "default".to_string(),
//!     detected_intent: None,
//!     confidence_score: None,
//!     created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
//! };
//! let records = vec![record(2, "Hi again", Some("Hello!"), 2), record(1, "Hi", None, 1)];
//!
//! let transcript = build_transcript("a", &records);
//! assert_eq!(transcript.messages.len(), 3);
//! assert_eq!(transcript.title, "Hi");
//!
//! let catalog = build_catalog(&records);
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(catalog[0].title, "Hi");
//! ```

pub mod api;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod storage;

// Re-export commonly used types
pub use api::{ChatBackend, HttpBackend};
pub use chat::{ChatController, ChatState};
pub use config::Config;
pub use error::{Result, UnichatError};
pub use history::{build_catalog, build_transcript, HistoryRecord, Message, SessionSummary, Transcript};

#[cfg(test)]
pub mod test_utils;
