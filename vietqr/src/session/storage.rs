//! Session state storage
//!
//! Persists the last-submitted form values as JSON so repeated invocations
//! start from what was entered before.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use super::state::SessionState;
use crate::payload::TransferRequest;

/// Errors raised while writing session state
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handles persistent storage of session state
pub struct SessionStore {
    storage_dir: PathBuf,
    state_file: PathBuf,
    pub state: SessionState,
}

impl SessionStore {
    const DEFAULT_STATE_FILE: &'static str = "session.json";

    /// Environment variable overriding the storage directory
    pub const STORAGE_DIR_ENV: &'static str = "VIETQR_STORAGE_DIR";

    /// Get the default storage directory
    fn get_default_storage_dir() -> PathBuf {
        if let Ok(path) = std::env::var(Self::STORAGE_DIR_ENV) {
            return PathBuf::from(path);
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".vietqr");
        }
        std::env::temp_dir().join("vietqr")
    }

    /// Create a new session store
    pub fn new(storage_path: Option<PathBuf>) -> Self {
        let storage_dir = storage_path.unwrap_or_else(Self::get_default_storage_dir);
        let state_file = storage_dir.join(Self::DEFAULT_STATE_FILE);

        Self {
            storage_dir,
            state_file,
            state: SessionState::default(),
        }
    }

    /// Path of the JSON state file
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Ensure the storage directory exists
    fn ensure_storage_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.storage_dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.storage_dir, fs::Permissions::from_mode(0o700));
        }
        Ok(())
    }

    /// Load session state from storage
    ///
    /// Returns true if state was loaded, false if defaults were used
    pub fn load(&mut self) -> bool {
        if !self.state_file.exists() {
            info!("No saved session, using defaults");
            self.state = SessionState::default();
            return false;
        }

        match fs::read_to_string(&self.state_file) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => {
                    self.state = state;
                    info!("Loaded session from {:?}", self.state_file);
                    true
                }
                Err(e) => {
                    warn!("Failed to parse session state: {}", e);
                    self.state = SessionState::default();
                    false
                }
            },
            Err(e) => {
                warn!("Failed to read session file: {}", e);
                self.state = SessionState::default();
                false
            }
        }
    }

    /// Save session state to storage
    pub fn save(&self) -> Result<(), SessionError> {
        self.ensure_storage_dir()?;
        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.state_file, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.state_file, fs::Permissions::from_mode(0o600));
        }
        debug!("Saved session to {:?}", self.state_file);
        Ok(())
    }

    /// Record a submitted request and persist it
    pub fn remember(&mut self, request: &TransferRequest) -> Result<(), SessionError> {
        self.state.remember(request);
        self.save()
    }

    /// Forget saved values and go back to defaults
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::default();
        if self.state_file.exists() {
            fs::remove_file(&self.state_file)?;
        }
        info!("Session reset to defaults");
        Ok(())
    }

    /// Get a reference to the current session state
    pub fn get_state(&self) -> &SessionState {
        &self.state
    }

    /// Get a mutable reference to the current session state
    pub fn get_state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}
