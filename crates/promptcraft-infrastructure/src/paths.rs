//! Unified path management for PromptCraft configuration files.
//!
//! All configuration, secrets, and the session snapshot live under the
//! platform config directory (e.g. `~/.config/promptcraft/` on Linux).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for PromptCraft.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/promptcraft/       # Config directory
/// ├── secret.json              # API keys
/// └── session.json             # Persisted session snapshot
/// ```
pub struct PromptCraftPaths;

impl PromptCraftPaths {
    /// Returns the PromptCraft configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("promptcraft"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to secret.json.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the persisted session snapshot.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }
}
