//! HTTP implementation of the assistant backend
//!
//! Thin reqwest wrapper: one GET for history, one POST for sending, one
//! DELETE for removing a session. No retries are attempted; failures are
//! mapped to [`UnichatError`] and handed back to the caller.

use super::{ChatBackend, HistoryPayload, SendRequest, SendResponse};
use crate::config::ServerConfig;
use crate::error::{Result, UnichatError};

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Backend reached over HTTP
///
/// # Examples
///
/// ```
/// use unichat::api::HttpBackend;
/// use unichat::config::ServerConfig;
///
/// let backend = HttpBackend::new(&ServerConfig::default()).unwrap();
/// assert_eq!(
///     backend.history_url(Some("abc")).unwrap().as_str(),
///     "http://localhost:8000/api/chat/history?session_id=abc"
/// );
/// ```
pub struct HttpBackend {
    client: Client,
    base_url: String,
    chat_path: String,
    history_path: String,
}

impl HttpBackend {
    /// Create a backend from server configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            UnichatError::Config(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("unichat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UnichatError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized HTTP backend: base_url={}, timeout={}s",
            config.base_url,
            config.timeout_seconds
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_path: config.chat_path.clone(),
            history_path: config.history_path.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw)
            .map_err(|e| UnichatError::Config(format!("Invalid endpoint {}: {}", raw, e)).into())
    }

    /// URL of the history endpoint, optionally scoped to one session
    ///
    /// # Errors
    ///
    /// Returns error if the joined URL is invalid
    pub fn history_url(&self, session_id: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint(&self.history_path)?;
        if let Some(id) = session_id.filter(|id| !id.is_empty()) {
            url.query_pairs_mut().append_pair("session_id", id);
        }
        Ok(url)
    }

    /// URL of the send endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the joined URL is invalid
    pub fn chat_url(&self) -> Result<Url> {
        self.endpoint(&self.chat_path)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body
        };
        tracing::warn!(status = status.as_u16(), "Backend returned error: {}", message);
        Err(UnichatError::Backend {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

fn transport_error(e: reqwest::Error) -> UnichatError {
    UnichatError::Transport(e.to_string())
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn fetch_history(&self, session_id: Option<&str>) -> Result<HistoryPayload> {
        let url = self.history_url(session_id)?;
        tracing::debug!(%url, "Fetching history");

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let response = Self::check_status(response).await?;
        let body = response.text().await.map_err(transport_error)?;

        Ok(HistoryPayload::parse(&body))
    }

    async fn send(&self, request: &SendRequest) -> Result<SendResponse> {
        let url = self.chat_url()?;
        tracing::debug!(%url, session_id = %request.session_id, "Sending message");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;
        let body = response.text().await.map_err(transport_error)?;

        serde_json::from_str(&body).map_err(|e| {
            UnichatError::Transport(format!("Invalid send response: {}", e)).into()
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut url = self.endpoint(&self.history_path)?;
        url.query_pairs_mut().append_pair("session_id", session_id);
        tracing::debug!(%url, "Deleting session");

        let response = self.client.delete(url).send().await.map_err(transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }
}
