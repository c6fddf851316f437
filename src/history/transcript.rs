//! Transcript reconstruction from flat history records

use super::render::render;
use super::types::{HistoryRecord, Message, Transcript, DEFAULT_TITLE};

/// Maximum number of characters kept from the first user message in a title
pub const TITLE_MAX_CHARS: usize = 30;

/// Suffix appended to a truncated title
pub const TITLE_ELLIPSIS: &str = "...";

/// Build the ordered transcript for `session_id` from unordered records
///
/// Records of other sessions are skipped. An empty `session_id` means the
/// caller already scoped the fetch, so every record is used. Sorting is
/// stable: records sharing a timestamp keep their input order.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use unichat::history::{build_transcript, HistoryRecord, Sender};
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let records = vec![HistoryRecord {
///     id: 1,
///     session_id: "a".to_string(),
///     user_query: "Hi".to_string(),
///     bot_response: Some("Hello!".to_string()),
///     model_used: "default".to_string(),
///     detected_intent: None,
///     confidence_score: None,
///     created_at: at,
/// }];
///
/// let transcript = build_transcript("a", &records);
/// assert_eq!(transcript.title, "Hi");
/// assert_eq!(transcript.messages[1].sender, Sender::Bot);
/// ```
pub fn build_transcript(session_id: &str, records: &[HistoryRecord]) -> Transcript {
    let mut scoped: Vec<&HistoryRecord> = records
        .iter()
        .filter(|r| session_id.is_empty() || r.session_id == session_id)
        .collect();
    scoped.sort_by_key(|r| r.created_at);

    let mut messages = Vec::with_capacity(scoped.len() * 2);
    for record in scoped {
        messages.push(Message::user(
            format!("{}-user", record.id),
            record.user_query.clone(),
            record.created_at,
        ));
        if let Some(reply) = record.reply() {
            messages.push(Message::bot(
                format!("{}-bot", record.id),
                render(reply),
                record.created_at,
                record.detected_intent.clone(),
                record.confidence_score,
            ));
        }
    }

    let title = derive_title(&messages);
    tracing::debug!(
        session_id,
        messages = messages.len(),
        "Built transcript"
    );

    Transcript {
        session_id: session_id.to_string(),
        title,
        messages,
    }
}

/// Title from the first user message, or the default placeholder
pub fn derive_title(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|m| m.is_user())
        .map(|m| truncate_title(&m.content))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Keep the first 30 characters, adding an ellipsis when text was cut
pub fn truncate_title(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}{}", head, TITLE_ELLIPSIS)
    } else {
        content.to_string()
    }
}
