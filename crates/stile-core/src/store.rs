//! Persisted session state.
//!
//! Stores the session in `<home>/session.json` with restricted permissions
//! (0600). The key names match what the portal's web front-end keeps in
//! browser storage, so a dump from either side reads the same.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::user::UserRecord;

/// Session store filename.
const SESSION_FILE: &str = "session.json";

/// Value of the logged-in flag when a session is active. The web front-end
/// stores the literal string `"true"`, and so do we.
const LOGGED_IN: &str = "true";

/// The persisted session, one file per key the front-end would keep.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionStore {
    /// The member record as the portal sent it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserRecord>,

    /// The member id, flattened to a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<String>,

    /// `"true"` while a session is active, absent otherwise.
    #[serde(rename = "isLoggedIn", skip_serializing_if = "Option::is_none")]
    pub is_logged_in: Option<String>,

    /// Username to prefill on the next login. Survives logout.
    #[serde(rename = "rememberedUsername", skip_serializing_if = "Option::is_none")]
    pub remembered_username: Option<String>,
}

impl SessionStore {
    /// Returns the path to the session file.
    pub fn store_path() -> PathBuf {
        paths::stile_home().join(SESSION_FILE)
    }

    /// Loads the session store from disk.
    /// Returns an empty store if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::store_path())
    }

    /// Loads the session store from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))
    }

    /// Saves the session store to disk with restricted permissions (0600).
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::store_path())
    }

    /// Saves the session store to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// True when the logged-in flag holds the active value.
    pub fn logged_in_flag(&self) -> bool {
        self.is_logged_in.as_deref() == Some(LOGGED_IN)
    }

    /// Records a fresh session for `user`.
    pub fn set_session(&mut self, user: UserRecord) {
        self.current_user_id = user.id_string();
        self.user_data = Some(user);
        self.is_logged_in = Some(LOGGED_IN.to_string());
    }

    /// Clears the session keys. The remembered username stays.
    pub fn clear_session(&mut self) {
        self.user_data = None;
        self.current_user_id = None;
        self.is_logged_in = None;
    }
}
