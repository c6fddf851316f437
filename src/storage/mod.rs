use crate::error::{Result, UnichatError};
use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod types;
pub use types::StoredState;

/// Holder of the "current session" pointer
///
/// The controller reads it at startup and writes it on every session switch
/// or creation.
pub trait SessionStore: Send + Sync {
    /// Currently selected session, if one was remembered
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read
    fn current(&self) -> Result<Option<String>>;

    /// Remember `session_id` as the current session
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written
    fn set_current(&self, session_id: &str) -> Result<()>;
}

/// Session pointer persisted as a small JSON file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store in the user's data directory
    ///
    /// `UNICHAT_STATE_FILE` overrides the location.
    ///
    /// # Errors
    ///
    /// Returns error if the data directory cannot be determined or created
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("UNICHAT_STATE_FILE") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("edu", "unichat", "unichat")
            .ok_or_else(|| UnichatError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("state.json"))
    }

    /// Create a store backed by the given file
    ///
    /// The file itself is created lazily on the first write.
    ///
    /// # Examples
    ///
    /// ```
    /// use unichat::storage::{FileSessionStore, SessionStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = FileSessionStore::new_with_path(dir.path().join("state.json")).unwrap();
    /// assert_eq!(store.current().unwrap(), None);
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for state file")
                .map_err(|e| UnichatError::Storage(e.to_string()))?;
        }

        Ok(Self { path })
    }

    /// Location of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_state(&self) -> Result<StoredState> {
        if !self.path.exists() {
            return Ok(StoredState::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read state file")
            .map_err(|e| UnichatError::Storage(e.to_string()))?;

        match serde_json::from_str(&contents) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(
                    "Ignoring corrupt state file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(StoredState::default())
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn current(&self) -> Result<Option<String>> {
        Ok(self
            .read_state()?
            .current_session_id
            .filter(|id| !id.is_empty()))
    }

    fn set_current(&self, session_id: &str) -> Result<()> {
        let state = StoredState {
            current_session_id: Some(session_id.to_string()),
            updated_at: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&state)
            .context("Failed to serialize state")
            .map_err(|e| UnichatError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .context("Failed to write state file")
            .map_err(|e| UnichatError::Storage(e.to_string()))?;

        tracing::debug!(session_id, path = %self.path.display(), "Saved current session");
        Ok(())
    }
}

/// In-process session pointer that is never persisted
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already points at `session_id`
    pub fn with_current(session_id: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(Some(session_id.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn current(&self) -> Result<Option<String>> {
        let guard = self
            .current
            .lock()
            .map_err(|_| UnichatError::Storage("session pointer lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn set_current(&self, session_id: &str) -> Result<()> {
        let mut guard = self
            .current
            .lock()
            .map_err(|_| UnichatError::Storage("session pointer lock poisoned".into()))?;
        *guard = Some(session_id.to_string());
        Ok(())
    }
}
