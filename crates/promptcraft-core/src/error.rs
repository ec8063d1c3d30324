//! Error types for the PromptCraft engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the PromptCraft crates.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PromptCraftError {
    /// No billable API credential is configured or selected.
    ///
    /// Raised before any network call is made; the video test stage is the
    /// only consumer.
    #[error("No billable API credential selected")]
    MissingCredential,

    /// A pipeline stage was invoked with an empty required input.
    #[error("Nothing to process: {field} is empty")]
    EmptyInput { field: &'static str },

    /// The optimize stage failed at the gateway; prior output is untouched.
    #[error("Prompt optimization failed: {0}")]
    OptimizeFailed(String),

    /// The analyze stage was invoked without an image test result.
    #[error("Analysis requires an image test result")]
    AnalysisUnavailable,

    /// A stage was invoked while a previous invocation is still in flight.
    #[error("Stage already in flight: {stage}")]
    StageInFlight { stage: &'static str },

    /// The session changed mode while a stage was awaiting the gateway.
    ///
    /// The stale result is discarded instead of being written back.
    #[error("Session changed while the stage was in flight; result discarded")]
    Superseded,

    /// Entity not found with type information.
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PromptCraftError {
    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error should be rendered inline rather than as a
    /// blocking notice.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

impl From<std::io::Error> for PromptCraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PromptCraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Convenient Result alias used across the PromptCraft crates.
pub type Result<T> = std::result::Result<T, PromptCraftError>;
