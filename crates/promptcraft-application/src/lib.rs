//! Application layer for PromptCraft.
//!
//! Wires the session, the gateway, and the store together: the
//! [`orchestrator::GenerationOrchestrator`] runs the pipeline stages, the
//! [`session_service::SessionService`] manages session lifecycle, and
//! [`autosave`] persists edits in the background.

pub mod autosave;
pub mod orchestrator;
pub mod session_service;

pub use autosave::{AutosaveHandle, DEFAULT_DEBOUNCE, spawn_autosave};
pub use orchestrator::{GenerationOrchestrator, progress_message};
pub use session_service::SessionService;
