//! Live transcript state and the send/receive state machine
//!
//! `ChatState` is owned by the controller and mutated only through the
//! methods here. Every session change bumps a generation counter; tickets
//! handed out for in-flight requests carry the generation they were issued
//! under, and results from an older generation are discarded.

use crate::history::{derive_title, render, truncate_title, Message, Transcript};
use chrono::Utc;
use std::fmt;

/// Whether a send is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Ready to accept input
    Idle,
    /// Waiting for the backend to answer
    Sending,
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStatus::Idle => write!(f, "idle"),
            SendStatus::Sending => write!(f, "sending"),
        }
    }
}

/// Ticket for a send that has been started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Trimmed message text
    pub text: String,
    /// Session the message was sent in
    pub session_id: String,
    /// Generation at the time of sending
    pub generation: u64,
    /// Id of the optimistic user message
    pub optimistic_id: String,
}

/// Ticket for a history fetch, checked again before the result is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    /// Session the fetch was issued for
    pub session_id: String,
    /// Generation at the time of the fetch
    pub generation: u64,
}

/// Assistant reply to append once a send succeeds
#[derive(Debug, Clone, PartialEq)]
pub struct BotReply {
    /// Raw reply text (rendered when appended)
    pub text: String,
    /// Detected intent
    pub intent: Option<String>,
    /// Intent confidence
    pub confidence: Option<f64>,
}

/// What happened to a completed send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Bot message appended
    Replied,
    /// Error flag raised
    Failed,
    /// Session changed while the request was in flight; result dropped
    Discarded,
}

/// Live chat state for the active session
#[derive(Debug, Clone)]
pub struct ChatState {
    transcript: Transcript,
    status: SendStatus,
    error: Option<String>,
    generation: u64,
    catalog_stale: bool,
    rollback_on_failure: bool,
}

impl ChatState {
    /// Create state for `session_id` with an empty transcript
    pub fn new(session_id: impl Into<String>, rollback_on_failure: bool) -> Self {
        Self {
            transcript: Transcript::empty(session_id),
            status: SendStatus::Idle,
            error: None,
            generation: 0,
            catalog_stale: false,
            rollback_on_failure,
        }
    }

    /// Active session id
    pub fn session_id(&self) -> &str {
        &self.transcript.session_id
    }

    /// Current transcript
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current title
    pub fn title(&self) -> &str {
        &self.transcript.title
    }

    /// Send status
    pub fn status(&self) -> SendStatus {
        self.status
    }

    /// Whether a send is in flight
    pub fn is_sending(&self) -> bool {
        self.status == SendStatus::Sending
    }

    /// User-visible error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switch to another session, dropping the live transcript
    ///
    /// Any in-flight send or fetch belongs to the previous generation and
    /// will be discarded when it completes.
    pub fn reset_session(&mut self, session_id: impl Into<String>) {
        self.generation += 1;
        self.transcript = Transcript::empty(session_id);
        self.status = SendStatus::Idle;
        self.error = None;
        tracing::debug!(
            session_id = %self.transcript.session_id,
            generation = self.generation,
            "Session reset"
        );
    }

    /// Rename the active session without starting a new generation
    ///
    /// Used when the backend files the exchange under a different id than
    /// the one the client proposed.
    pub fn adopt_session_id(&mut self, session_id: impl Into<String>) {
        self.transcript.session_id = session_id.into();
    }

    /// Start a send
    ///
    /// Returns `None` without touching state when the trimmed input is empty
    /// or another send is already in flight. Otherwise appends the
    /// optimistic user message, derives the title if this is the first
    /// message, and enters `Sending`.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        if self.is_sending() {
            tracing::debug!("Send ignored: another send is in flight");
            return None;
        }

        let optimistic_id = uuid::Uuid::new_v4().to_string();
        if self.transcript.messages.is_empty() {
            self.transcript.title = truncate_title(text);
        }
        self.transcript
            .messages
            .push(Message::user(optimistic_id.clone(), text, Utc::now()));
        self.status = SendStatus::Sending;
        self.error = None;

        Some(PendingSend {
            text: text.to_string(),
            session_id: self.transcript.session_id.clone(),
            generation: self.generation,
            optimistic_id,
        })
    }

    /// Finish a send started with [`ChatState::begin_send`]
    pub fn complete_send(
        &mut self,
        pending: &PendingSend,
        result: std::result::Result<BotReply, String>,
    ) -> SendOutcome {
        if pending.generation != self.generation {
            tracing::debug!(
                sent_generation = pending.generation,
                current_generation = self.generation,
                "Discarding reply for a previous session"
            );
            return SendOutcome::Discarded;
        }

        self.status = SendStatus::Idle;
        match result {
            Ok(reply) => {
                self.transcript.messages.push(Message::bot(
                    uuid::Uuid::new_v4().to_string(),
                    render(&reply.text),
                    Utc::now(),
                    reply.intent,
                    reply.confidence,
                ));
                self.catalog_stale = true;
                SendOutcome::Replied
            }
            Err(message) => {
                if self.rollback_on_failure {
                    self.transcript
                        .messages
                        .retain(|m| m.id != pending.optimistic_id);
                    self.transcript.title = derive_title(&self.transcript.messages);
                }
                self.error = Some(message);
                SendOutcome::Failed
            }
        }
    }

    /// Issue a ticket for a history fetch of the active session
    pub fn begin_history_fetch(&self) -> HistoryTicket {
        HistoryTicket {
            session_id: self.transcript.session_id.clone(),
            generation: self.generation,
        }
    }

    /// Replace the transcript with a freshly built one, if still current
    ///
    /// Returns `false` and leaves state untouched when the session changed
    /// after the ticket was issued.
    pub fn apply_history(&mut self, ticket: &HistoryTicket, transcript: Transcript) -> bool {
        if ticket.generation != self.generation || ticket.session_id != self.session_id() {
            tracing::debug!(
                ticket_session = %ticket.session_id,
                current_session = %self.session_id(),
                "Discarding stale history response"
            );
            return false;
        }
        self.transcript = Transcript {
            session_id: ticket.session_id.clone(),
            ..transcript
        };
        true
    }

    /// Raise the user-visible error flag
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Clear the user-visible error flag
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Consume the catalog refresh signal
    pub fn take_catalog_refresh(&mut self) -> bool {
        std::mem::take(&mut self.catalog_stale)
    }
}
