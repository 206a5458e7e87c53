//! Configuration management for stile.
//!
//! Loads configuration from ${STILE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

pub mod paths {
    //! Path resolution for stile configuration and session data.
    //!
    //! STILE_HOME resolution order:
    //! 1. STILE_HOME environment variable (if set)
    //! 2. ~/.config/stile (default)

    use std::path::PathBuf;

    /// Returns the stile home directory.
    ///
    /// Checks STILE_HOME env var first, falls back to ~/.config/stile
    pub fn stile_home() -> PathBuf {
        if let Ok(home) = std::env::var("STILE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("stile"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        stile_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Portal API base URL (STILE_PORTAL_URL env var wins over this)
    pub portal_url: Option<String>,

    /// Where the portal's web pages live; derived from `portal_url` if unset
    pub pages_url: Option<String>,

    /// Ask for confirmation before signing out
    pub confirm_logout: bool,
}

impl Config {
    const DEFAULT_CONFIRM_LOGOUT: bool = true;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the configured portal URL, if set.
    /// Empty strings are treated as unset.
    pub fn effective_portal_url(&self) -> Option<&str> {
        self.portal_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Returns the configured pages URL, if set.
    /// Empty strings are treated as unset.
    pub fn effective_pages_url(&self) -> Option<&str> {
        self.pages_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Saves only the portal_url field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_portal_url(url: &str) -> Result<()> {
        Self::save_portal_url_to(&paths::config_path(), url)
    }

    /// Saves only the portal_url field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_portal_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        // Read existing file or use default template
        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        // Parse as editable document (preserves comments and formatting)
        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        // Update portal_url field
        doc["portal_url"] = value(url);

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal_url: None,
            pages_url: None,
            confirm_logout: Self::DEFAULT_CONFIRM_LOGOUT,
        }
    }
}
