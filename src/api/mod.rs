//! Assistant backend interface
//!
//! The [`ChatBackend`] trait is the seam between the chat controller and the
//! network. [`HttpBackend`] talks to the real service; tests substitute a
//! scripted fake.

pub mod http;

use crate::error::Result;
use crate::history::{build_catalog, build_transcript, sort_catalog, HistoryRecord, SessionSummary, Transcript};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpBackend;

/// Operations the chat client needs from the assistant backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetch history, optionally scoped to one session
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status. A body
    /// that cannot be parsed is not an error; it yields
    /// [`HistoryPayload::Empty`].
    async fn fetch_history(&self, session_id: Option<&str>) -> Result<HistoryPayload>;

    /// Send a user message and wait for the assistant's reply
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status
    async fn send(&self, request: &SendRequest) -> Result<SendResponse>;

    /// Delete every record of a session
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// History as returned by the backend, in whichever shape it arrived
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryPayload {
    /// Flat question/answer records
    Records(Vec<HistoryRecord>),
    /// Legacy pre-grouped session list
    Sessions(Vec<SessionSummary>),
    /// Empty or unparseable body
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Records(Vec<HistoryRecord>),
    Wrapped {
        #[serde(alias = "records")]
        history: Vec<HistoryRecord>,
    },
    Sessions {
        sessions: Vec<SessionSummary>,
    },
}

impl HistoryPayload {
    /// Parse a response body, treating anything unrecognised as no history
    ///
    /// # Examples
    ///
    /// ```
    /// use unichat::api::HistoryPayload;
    ///
    /// assert_eq!(HistoryPayload::parse(""), HistoryPayload::Empty);
    /// assert_eq!(HistoryPayload::parse("{\"oops\": 1}"), HistoryPayload::Empty);
    /// assert!(matches!(HistoryPayload::parse("[]"), HistoryPayload::Records(r) if r.is_empty()));
    /// ```
    pub fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<WirePayload>(body) {
            Ok(WirePayload::Records(records)) | Ok(WirePayload::Wrapped { history: records }) => {
                Self::Records(records)
            }
            Ok(WirePayload::Sessions { sessions }) => Self::Sessions(sessions),
            Err(e) => {
                tracing::warn!("Unrecognised history payload, treating as empty: {}", e);
                Self::Empty
            }
        }
    }

    /// Flat records, empty for the legacy session shape
    pub fn records(&self) -> &[HistoryRecord] {
        match self {
            Self::Records(records) => records,
            Self::Sessions(_) | Self::Empty => &[],
        }
    }

    /// Session catalog, built from records or sorted from the legacy list
    pub fn catalog(&self) -> Vec<SessionSummary> {
        match self {
            Self::Records(records) => build_catalog(records),
            Self::Sessions(sessions) => {
                let mut sessions: Vec<SessionSummary> = sessions
                    .iter()
                    .filter(|s| !s.session_id.is_empty())
                    .cloned()
                    .collect();
                sort_catalog(&mut sessions);
                sessions
            }
            Self::Empty => Vec::new(),
        }
    }

    /// Transcript for `session_id` built from the flat records
    pub fn transcript(&self, session_id: &str) -> Transcript {
        build_transcript(session_id, self.records())
    }
}

/// Body of the send request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    /// User's message text
    pub message: String,
    /// Model requested for the reply
    pub model: String,
    /// Session the message belongs to
    pub session_id: String,
}

/// Reply to a send request
///
/// Deployments disagree on the name of the reply field, so all three known
/// names are accepted and [`SendResponse::reply_text`] picks one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Preferred reply field
    #[serde(default)]
    pub bot_response: Option<String>,
    /// Older reply field
    #[serde(default)]
    pub response: Option<String>,
    /// Oldest reply field
    #[serde(default)]
    pub message: Option<String>,
    /// Session id the backend filed the exchange under
    #[serde(default)]
    pub session_id: Option<String>,
    /// Intent label assigned to the user message
    #[serde(default)]
    pub detected_intent: Option<String>,
    /// Confidence for `detected_intent`
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

impl SendResponse {
    /// Reply text by preference: `bot_response`, then `response`, then `message`
    ///
    /// Empty strings are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use unichat::api::SendResponse;
    ///
    /// let response = SendResponse {
    ///     bot_response: Some(String::new()),
    ///     response: Some("from response".to_string()),
    ///     message: Some("from message".to_string()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(response.reply_text(), Some("from response"));
    /// ```
    pub fn reply_text(&self) -> Option<&str> {
        [&self.bot_response, &self.response, &self.message]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|text| !text.is_empty())
    }

    /// Server-assigned session id, if present and non-empty
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}
