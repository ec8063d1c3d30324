//! Debounced session autosave.
//!
//! Edits notify the autosave task; the task waits out a quiet window and
//! persists one snapshot per burst instead of one per keystroke.

use promptcraft_core::session::{GenerationSession, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::sync::mpsc;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Handle for signalling that the session changed.
///
/// Dropping every handle stops the background task after it flushes any
/// pending save.
#[derive(Clone)]
pub struct AutosaveHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl AutosaveHandle {
    /// Marks the session dirty. Cheap and non-blocking; safe to call on
    /// every edit.
    pub fn notify(&self) {
        let _ = self.tx.send(());
    }
}

/// Spawns the background autosave task and returns its handle.
pub fn spawn_autosave(
    store: Arc<dyn SessionStore>,
    session: Arc<RwLock<GenerationSession>>,
    debounce: Duration,
) -> AutosaveHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();

    tokio::spawn(async move {
        'outer: while rx.recv().await.is_some() {
            // Coalesce notifications arriving inside the quiet window.
            let mut closed = false;
            loop {
                match tokio::time::timeout(debounce, rx.recv()).await {
                    Ok(Some(())) => continue,
                    Ok(None) => {
                        closed = true;
                        break;
                    }
                    Err(_) => break,
                }
            }

            let snapshot = session.read().await.snapshot();
            if let Err(err) = store.save(&snapshot).await {
                tracing::warn!("[Autosave] save failed: {err}");
            } else {
                tracing::debug!("[Autosave] session persisted");
            }

            if closed {
                break 'outer;
            }
        }
        tracing::debug!("[Autosave] all handles dropped, task exiting");
    });

    AutosaveHandle { tx }
}
