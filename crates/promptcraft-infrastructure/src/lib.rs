//! Infrastructure layer for PromptCraft.
//!
//! File-backed implementations of the persistence and credential
//! collaborators: the session snapshot store, secret storage, and path
//! resolution.

pub mod paths;
pub mod secret_storage;
pub mod session_store;

pub use secret_storage::{SecretStorage, StoredCredentials};
pub use session_store::{JsonSessionStore, export_snapshot, import_snapshot};
