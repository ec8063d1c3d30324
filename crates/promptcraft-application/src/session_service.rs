//! Session lifecycle: load, save, compose, export/import, reset.

use promptcraft_core::assembler::{PromptGroup, assemble};
use promptcraft_core::config::GenerationMode;
use promptcraft_core::error::Result;
use promptcraft_core::session::{ActiveView, GenerationSession, SessionStore};
use promptcraft_infrastructure::{export_snapshot, import_snapshot};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Coordinates the shared session with its persistence store.
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    session: Arc<RwLock<GenerationSession>>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            session: Arc::new(RwLock::new(GenerationSession::default())),
        }
    }

    /// The shared session handle, for the orchestrator and autosave.
    pub fn session(&self) -> Arc<RwLock<GenerationSession>> {
        Arc::clone(&self.session)
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Restores the persisted snapshot if one exists. A missing or
    /// unreadable snapshot leaves the fresh default session in place;
    /// startup never fails on a bad save file.
    pub async fn load_or_default(&self) {
        match self.store.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!("[SessionService] restoring persisted session");
                *self.session.write().await = GenerationSession::from_snapshot(snapshot);
            }
            Ok(None) => {
                tracing::debug!("[SessionService] no persisted session, starting fresh");
            }
            Err(err) => {
                tracing::warn!("[SessionService] failed to load session, starting fresh: {err}");
            }
        }
    }

    /// Persists the current session immediately, bypassing the autosave
    /// debounce.
    pub async fn save_now(&self) -> Result<()> {
        let snapshot = self.session.read().await.snapshot();
        self.store.save(&snapshot).await
    }

    /// Switches the generation mode, applying the coupled defaults and
    /// clearing stale results.
    pub async fn set_mode(&self, mode: GenerationMode) {
        self.session.write().await.apply_mode_change(mode);
    }

    /// Assembles a prompt from the scene descriptor and loads it into both
    /// the raw input and the optimized output, ready for an immediate test
    /// run.
    pub async fn compose_structured(&self, group: PromptGroup) -> String {
        let mut session = self.session.write().await;
        let prompt = assemble(&session.descriptor, group, &session.config);
        session.raw_input = prompt.clone();
        session.optimized_output = prompt.clone();
        session.active_view = ActiveView::Editor;
        prompt
    }

    /// Writes the current session to a standalone export file.
    pub async fn export(&self, path: &Path) -> Result<()> {
        let snapshot = self.session.read().await.snapshot();
        export_snapshot(path, &snapshot).await
    }

    /// Replaces the current session with one imported from a file.
    ///
    /// A malformed or missing file leaves the current session untouched.
    pub async fn import(&self, path: &Path) -> Result<()> {
        let snapshot = import_snapshot(path).await?;
        *self.session.write().await = GenerationSession::from_snapshot(snapshot);
        tracing::info!("[SessionService] imported session from {}", path.display());
        Ok(())
    }

    /// Clears the persisted snapshot and resets every field to its default.
    pub async fn reset(&self) -> Result<()> {
        self.store.clear().await?;
        *self.session.write().await = GenerationSession::default();
        tracing::info!("[SessionService] session reset");
        Ok(())
    }
}
