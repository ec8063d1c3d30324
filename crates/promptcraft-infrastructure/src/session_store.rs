//! File-backed session snapshot storage.
//!
//! One JSON document per installation, keyed by the fixed
//! [`SESSION_KEY`]: the debounced autosave, the explicit save, and the
//! startup load all go through [`JsonSessionStore`]. Export/import reuse
//! the exact same snapshot shape as a standalone file.

use crate::paths::PromptCraftPaths;
use async_trait::async_trait;
use promptcraft_core::error::{PromptCraftError, Result};
use promptcraft_core::session::{SESSION_KEY, SessionSnapshot, SessionStore};
use std::path::{Path, PathBuf};
use tokio::fs;

/// [`SessionStore`] implementation persisting the snapshot as JSON.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    /// Creates a store at the default location
    /// (`~/.config/promptcraft/session.json`).
    pub fn new() -> Result<Self> {
        let path = PromptCraftPaths::session_file()
            .map_err(|e| PromptCraftError::io(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load(&self) -> Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).await?;
        let snapshot = serde_json::from_str(&content)?;
        tracing::debug!("[JsonSessionStore] loaded snapshot '{}'", SESSION_KEY);
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, content).await?;
        tracing::debug!("[JsonSessionStore] saved snapshot '{}'", SESSION_KEY);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
            tracing::debug!("[JsonSessionStore] cleared snapshot '{}'", SESSION_KEY);
        }
        Ok(())
    }
}

/// Writes a snapshot to `path` as a standalone export file.
pub async fn export_snapshot(path: &Path, snapshot: &SessionSnapshot) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Reads a snapshot from an exported file.
///
/// A malformed file yields an error and nothing else: the caller keeps its
/// current session untouched.
pub async fn import_snapshot(path: &Path) -> Result<SessionSnapshot> {
    if !path.exists() {
        return Err(PromptCraftError::not_found(
            "session export",
            path.display().to_string(),
        ));
    }
    let content = fs::read_to_string(path).await?;
    let snapshot = serde_json::from_str(&content)?;
    Ok(snapshot)
}
