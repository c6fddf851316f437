//! Error types for Unichat
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Unichat operations
///
/// Covers configuration loading, backend calls, session pointer storage,
/// and session lookups performed by the chat controller.
#[derive(Error, Debug)]
pub enum UnichatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend answered with a non-success HTTP status
    #[error("Backend error: status={status}, {message}")]
    Backend {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Request never produced a usable response (connect, timeout, decode)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Current-session pointer could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// No session in the catalog matches the given id or prefix
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A prefix matched more than one session
    #[error("Session prefix {prefix} is ambiguous ({matches} matches)")]
    AmbiguousSession {
        /// The prefix typed by the user
        prefix: String,
        /// How many catalog entries matched
        matches: usize,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Unichat operations
///
/// Uses `anyhow::Error` so callers can attach context while the concrete
/// `UnichatError` stays reachable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
