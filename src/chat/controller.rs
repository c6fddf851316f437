//! Chat orchestration
//!
//! Glues the backend, the session pointer store, and the pure history
//! builders together. The controller owns the live [`ChatState`] and the
//! session catalog; callers drive it one operation at a time.

use super::state::{BotReply, ChatState, SendOutcome};
use crate::api::{ChatBackend, SendRequest};
use crate::config::ChatConfig;
use crate::error::{Result, UnichatError};
use crate::history::{find_session, SessionSummary, Transcript};
use crate::storage::SessionStore;

/// Drives a chat against a backend and remembers the current session
///
/// Every operation takes `&mut self` across its await points, so callers
/// run one operation at a time; a session switch cannot overlap a send or
/// fetch issued through the same controller. The generation checks in
/// [`ChatState`] cover callers that drive the state machine directly.
///
/// # Examples
///
/// ```no_run
/// use unichat::api::HttpBackend;
/// use unichat::chat::ChatController;
/// use unichat::config::Config;
/// use unichat::storage::MemorySessionStore;
///
/// # async fn example() -> unichat::error::Result<()> {
/// let config = Config::default();
/// let backend = HttpBackend::new(&config.server)?;
/// let mut controller = ChatController::new(backend, MemorySessionStore::new(), &config.chat);
/// controller.start(None).await?;
/// controller.send("When does registration open?").await?;
/// println!("{}", controller.state().title());
/// # Ok(())
/// # }
/// ```
pub struct ChatController<B, S> {
    backend: B,
    store: S,
    model: String,
    state: ChatState,
    catalog: Vec<SessionSummary>,
}

impl<B: ChatBackend, S: SessionStore> ChatController<B, S> {
    /// Create a controller; call [`ChatController::start`] before use
    pub fn new(backend: B, store: S, config: &ChatConfig) -> Self {
        Self {
            backend,
            store,
            model: config.model.clone(),
            state: ChatState::new(String::new(), config.rollback_on_failure),
            catalog: Vec::new(),
        }
    }

    /// Live chat state
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Session catalog from the last successful refresh
    pub fn catalog(&self) -> &[SessionSummary] {
        &self.catalog
    }

    /// Model sent with each message
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Session remembered by the store, without opening it
    ///
    /// # Errors
    ///
    /// Returns error if the session store cannot be read
    pub fn remembered_session(&self) -> Result<Option<String>> {
        self.store.current()
    }

    /// Clear the user-visible error
    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }

    /// Open the initial session
    ///
    /// `requested` (an id or catalog prefix) wins over the remembered
    /// session; with neither, a new session is created. Network failures
    /// while loading are recorded in the error flag and do not abort
    /// startup.
    ///
    /// # Errors
    ///
    /// Returns error if the session store fails, `requested` is blank, or
    /// `requested` is an ambiguous prefix
    pub async fn start(&mut self, requested: Option<&str>) -> Result<()> {
        if let Some(id) = requested.filter(|id| id.trim().is_empty()) {
            return Err(UnichatError::SessionNotFound(id.to_string()).into());
        }

        // Opening a session clears the error flag, so keep the catalog failure
        let catalog_error = match self.refresh_catalog().await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Could not load session catalog: {}", e);
                self.state.error().map(str::to_string)
            }
        };

        let session_id = match requested {
            Some(id) => match self.resolve_session(id) {
                Ok(full) => Some(full),
                Err(e) if is_not_found(&e) => Some(id.to_string()),
                Err(e) => return Err(e),
            },
            None => self.store.current()?,
        };

        match session_id {
            Some(session_id) => {
                self.open_session(&session_id)?;
                if let Err(e) = self.reload_transcript().await {
                    tracing::warn!("Could not load transcript for {}: {}", session_id, e);
                }
            }
            None => {
                self.new_session()?;
            }
        }

        if self.state.error().is_none() {
            if let Some(message) = catalog_error {
                self.state.set_error(message);
            }
        }
        Ok(())
    }

    /// Start a fresh session and make it current
    ///
    /// # Errors
    ///
    /// Returns error if the session store cannot be written
    pub fn new_session(&mut self) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.open_session(&session_id)?;
        tracing::info!(session_id = %session_id, "Started new session");
        Ok(session_id)
    }

    /// Switch to a session from the catalog and load its transcript
    ///
    /// # Errors
    ///
    /// Returns error if no unique session matches, the store fails, or the
    /// history fetch fails (the error flag is set in that case too)
    pub async fn switch_session(&mut self, id_or_prefix: &str) -> Result<()> {
        let session_id = self.resolve_session(id_or_prefix)?;
        self.open_session(&session_id)?;
        tracing::info!(session_id = %session_id, "Switched session");
        self.reload_transcript().await
    }

    /// Fetch the active session's history and rebuild the transcript
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails; the error flag is set as well
    pub async fn reload_transcript(&mut self) -> Result<()> {
        let ticket = self.state.begin_history_fetch();
        let payload = match self.backend.fetch_history(Some(&ticket.session_id)).await {
            Ok(payload) => payload,
            Err(e) => return Err(self.record_failure("Failed to load conversation", e)),
        };

        let transcript = payload.transcript(&ticket.session_id);
        if self.state.apply_history(&ticket, transcript) {
            tracing::debug!(
                session_id = %ticket.session_id,
                messages = self.state.transcript().len(),
                "Transcript reloaded"
            );
        }
        Ok(())
    }

    /// Fetch all history and rebuild the session catalog
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails; the error flag is set as well
    pub async fn refresh_catalog(&mut self) -> Result<()> {
        match self.backend.fetch_history(None).await {
            Ok(payload) => {
                self.catalog = payload.catalog();
                Ok(())
            }
            Err(e) => Err(self.record_failure("Failed to load sessions", e)),
        }
    }

    /// Fetch and build the transcript of any session without changing state
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails
    pub async fn load_transcript(&self, session_id: &str) -> Result<Transcript> {
        let payload = self.backend.fetch_history(Some(session_id)).await?;
        Ok(payload.transcript(session_id))
    }

    /// Send a message in the active session
    ///
    /// Returns `Ok(None)` when the input was blank or a send is already in
    /// flight. Backend failures are not returned as errors: they end in
    /// [`SendOutcome::Failed`] with the error flag set.
    ///
    /// # Errors
    ///
    /// Returns error only if the session store cannot be written
    pub async fn send(&mut self, input: &str) -> Result<Option<SendOutcome>> {
        let Some(pending) = self.state.begin_send(input) else {
            return Ok(None);
        };

        let request = SendRequest {
            message: pending.text.clone(),
            model: self.model.clone(),
            session_id: pending.session_id.clone(),
        };

        let result = match self.backend.send(&request).await {
            Ok(response) => match response.reply_text() {
                Some(text) => Ok((
                    BotReply {
                        text: text.to_string(),
                        intent: response.detected_intent.clone(),
                        confidence: response.confidence_score,
                    },
                    response.session_id().map(str::to_string),
                )),
                None => Err("Backend returned an empty reply".to_string()),
            },
            Err(e) => Err(format!("Failed to send message: {}", e)),
        };

        let outcome = match result {
            Ok((reply, server_session)) => {
                let outcome = self.state.complete_send(&pending, Ok(reply));
                if outcome == SendOutcome::Replied {
                    if let Some(server_id) = server_session {
                        if server_id != pending.session_id {
                            tracing::info!(
                                local = %pending.session_id,
                                server = %server_id,
                                "Backend assigned a different session id"
                            );
                            self.state.adopt_session_id(server_id.clone());
                            self.store.set_current(&server_id)?;
                        }
                    }
                }
                outcome
            }
            Err(message) => {
                tracing::warn!("{}", message);
                self.state.complete_send(&pending, Err(message))
            }
        };

        if self.state.take_catalog_refresh() {
            if let Err(e) = self.refresh_catalog().await {
                tracing::warn!("Catalog refresh after send failed: {}", e);
            }
        }

        Ok(Some(outcome))
    }

    /// Delete a session on the backend and drop it from the catalog
    ///
    /// Deleting the active session starts a new one.
    ///
    /// # Errors
    ///
    /// Returns error if no unique session matches or the backend call fails
    pub async fn delete_session(&mut self, id_or_prefix: &str) -> Result<()> {
        let session_id = self.resolve_session(id_or_prefix)?;

        if let Err(e) = self.backend.delete_session(&session_id).await {
            return Err(self.record_failure("Failed to delete session", e));
        }

        self.catalog.retain(|s| s.session_id != session_id);
        tracing::info!(session_id = %session_id, "Deleted session");

        if self.state.session_id() == session_id {
            self.new_session()?;
        }
        Ok(())
    }

    /// Resolve a full id or unique prefix against the catalog
    ///
    /// # Errors
    ///
    /// Returns [`UnichatError::SessionNotFound`] or
    /// [`UnichatError::AmbiguousSession`]
    pub fn resolve_session(&self, id_or_prefix: &str) -> Result<String> {
        match find_session(&self.catalog, id_or_prefix) {
            Ok(Some(summary)) => Ok(summary.session_id.clone()),
            Ok(None) => Err(UnichatError::SessionNotFound(id_or_prefix.to_string()).into()),
            Err(matches) => Err(UnichatError::AmbiguousSession {
                prefix: id_or_prefix.to_string(),
                matches,
            }
            .into()),
        }
    }

    fn open_session(&mut self, session_id: &str) -> Result<()> {
        self.store.set_current(session_id)?;
        self.state.reset_session(session_id);
        Ok(())
    }

    fn record_failure(&mut self, action: &str, error: anyhow::Error) -> anyhow::Error {
        tracing::warn!("{}: {}", action, error);
        self.state.set_error(format!("{}: {}", action, error));
        error
    }
}

fn is_not_found(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<UnichatError>(),
        Some(UnichatError::SessionNotFound(_))
    )
}
