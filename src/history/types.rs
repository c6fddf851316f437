use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Title shown for a transcript that has no user message yet
pub const DEFAULT_TITLE: &str = "New Conversation";

/// One persisted question/answer exchange returned by the backend
///
/// Records are server-authoritative snapshots. Field names follow the
/// backend's snake_case wire format; camelCase aliases are accepted for
/// older deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Backend row id
    #[serde(default)]
    pub id: i64,
    /// Session the exchange belongs to (empty when the backend omitted it)
    #[serde(default, alias = "sessionId", deserialize_with = "null_as_empty")]
    pub session_id: String,
    /// Text the user sent
    #[serde(default, alias = "userQuery", deserialize_with = "null_as_empty")]
    pub user_query: String,
    /// Assistant reply, absent while the exchange has not produced one
    #[serde(default, alias = "botResponse")]
    pub bot_response: Option<String>,
    /// Model that produced the reply
    #[serde(default, alias = "modelUsed", deserialize_with = "null_as_empty")]
    pub model_used: String,
    /// Intent label assigned by the backend classifier
    #[serde(default, alias = "detectedIntent")]
    pub detected_intent: Option<String>,
    /// Classifier confidence for `detected_intent`
    #[serde(default, alias = "confidenceScore")]
    pub confidence_score: Option<f64>,
    /// When the exchange was stored
    #[serde(alias = "createdAt", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Bot reply text, or `None` when absent or empty
    pub fn reply(&self) -> Option<&str> {
        self.bot_response.as_deref().filter(|r| !r.is_empty())
    }

    /// Whether the record carries a usable session id
    pub fn has_session(&self) -> bool {
        !self.session_id.is_empty()
    }
}

/// Who authored a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the client
    User,
    /// The assistant backend
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single display message in a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable id (`<record id>-user` / `<record id>-bot` for history, uuid otherwise)
    pub id: String,
    /// Message body; bot content is already rendered markup
    pub content: String,
    /// Author of the message
    pub sender: Sender,
    /// Timestamp of the source record, or local time for optimistic messages
    pub timestamp: DateTime<Utc>,
    /// Detected intent (bot messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Intent confidence (bot messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Message {
    /// Create a user message
    pub fn user(id: impl Into<String>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender: Sender::User,
            timestamp,
            intent: None,
            confidence: None,
        }
    }

    /// Create a bot message
    pub fn bot(
        id: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        intent: Option<String>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender: Sender::Bot,
            timestamp,
            intent,
            confidence,
        }
    }

    /// Whether the user authored this message
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered messages for one session together with its derived title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Session the messages belong to (may be empty for an unscoped build)
    pub session_id: String,
    /// Derived human-readable title
    pub title: String,
    /// Messages in display order
    pub messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript with the default title
    pub fn empty(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Summary entry for the "recent conversations" view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    #[serde(alias = "sessionId")]
    pub session_id: String,
    /// User query of the earliest record in the session
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Earliest record time
    #[serde(alias = "createdAt", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Latest record time
    #[serde(
        default,
        alias = "updatedAt",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Time used to order the catalog: `updated_at`, falling back to `created_at`
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Title for display, substituting a truncated id when the title is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use unichat::history::SessionSummary;
    ///
    /// let summary = SessionSummary {
    ///     session_id: "0f3c9a2e-1111-2222-3333-444455556666".to_string(),
    ///     title: String::new(),
    ///     created_at: Utc::now(),
    ///     updated_at: None,
    /// };
    /// assert_eq!(summary.display_title(), "0f3c9a2e...");
    /// ```
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            let short: String = self.session_id.chars().take(8).collect();
            format!("{}...", short)
        } else {
            self.title.clone()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse RFC 3339, or a naive ISO timestamp interpreted as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        _ => Ok(None),
    }
}
