//! Test utilities for Unichat
//!
//! Record builders with readable timestamps and a scripted in-memory
//! backend for exercising the chat controller without a network.

use crate::api::{ChatBackend, HistoryPayload, SendRequest, SendResponse};
use crate::error::{Result, UnichatError};
use crate::history::HistoryRecord;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Fixed base time plus `seconds`
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap() + Duration::seconds(seconds)
}

/// Build a history record
///
/// `reply` of `None` leaves the bot response absent.
pub fn record(
    id: i64,
    session_id: &str,
    query: &str,
    reply: Option<&str>,
    created_at: DateTime<Utc>,
) -> HistoryRecord {
    HistoryRecord {
        id,
        session_id: session_id.to_string(),
        user_query: query.to_string(),
        bot_response: reply.map(str::to_string),
        model_used: "default".to_string(),
        detected_intent: None,
        confidence_score: None,
        created_at,
    }
}

/// In-memory backend with scripted replies and call recording
#[derive(Default)]
pub struct FakeBackend {
    records: Mutex<Vec<HistoryRecord>>,
    replies: Mutex<VecDeque<std::result::Result<SendResponse, String>>>,
    sent: Mutex<Vec<SendRequest>>,
    deleted: Mutex<Vec<String>>,
    history_calls: AtomicUsize,
    fail_history: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeBackend {
    /// Backend serving the given records
    pub fn new(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Queue the result of the next send (unqueued sends echo the message)
    pub fn push_reply(&self, reply: std::result::Result<SendResponse, String>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Make history fetches fail
    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    /// Make deletes fail
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Requests received by `send`
    pub fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Session ids received by `delete_session`
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Number of history fetches
    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn fetch_history(&self, session_id: Option<&str>) -> Result<HistoryPayload> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(UnichatError::Transport("history unavailable".to_string()).into());
        }
        let records = self.records.lock().unwrap();
        let scoped = records
            .iter()
            .filter(|r| session_id.map_or(true, |id| r.session_id == id))
            .cloned()
            .collect();
        Ok(HistoryPayload::Records(scoped))
    }

    async fn send(&self, request: &SendRequest) -> Result<SendResponse> {
        self.sent.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(UnichatError::Transport(message).into()),
            None => Ok(SendResponse {
                bot_response: Some(format!("echo: {}", request.message)),
                ..Default::default()
            }),
        }
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(UnichatError::Backend {
                status: 500,
                message: "delete failed".to_string(),
            }
            .into());
        }
        self.deleted.lock().unwrap().push(session_id.to_string());
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.session_id != session_id);
        Ok(())
    }
}
