use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk contents of the session pointer file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    /// Session the client reopens on startup
    #[serde(default)]
    pub current_session_id: Option<String>,
    /// When the pointer last changed
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
