//! Model Gateway boundary.
//!
//! The orchestrator talks to the generative backend exclusively through
//! [`ModelGateway`]; the concrete HTTP client lives in [`crate::gemini`]
//! and tests substitute their own implementations.

use async_trait::async_trait;
use promptcraft_core::config::{AspectRatio, GenerationMode};
use promptcraft_core::instructions::InstructionPayload;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised at the gateway boundary. The orchestrator folds these
/// into user-facing stage results; they never escape past it.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// No API key is configured for the backend.
    #[error("API key not configured: {0}")]
    MissingApiKey(String),

    /// The HTTP request itself failed (connect, timeout, body).
    #[error("Gateway request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("Gateway returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response arrived but could not be decoded.
    #[error("Failed to parse gateway response: {0}")]
    Parse(String),

    /// The backend reported success with no usable payload.
    #[error("Gateway returned no usable content")]
    NoContent,
}

/// An inline binary payload (image) returned by or sent to the backend,
/// with its body base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlinePayload {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

impl InlinePayload {
    /// Renders the payload as a `data:` URI, the shape stored in
    /// `GenerationSession::test_result`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses a `data:<mime>;base64,<data>` URI back into a payload.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

/// Decoded content of a synchronous generation response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelContent {
    pub text: Option<String>,
    pub inline: Vec<InlinePayload>,
}

impl ModelContent {
    pub fn first_inline(&self) -> Option<&InlinePayload> {
        self.inline.first()
    }
}

/// Opaque handle to an in-flight video generation job.
///
/// Owned by the orchestrator for the duration of one test invocation and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOperation {
    /// Backend operation name used for polling.
    pub name: String,
    pub done: bool,
    /// First generated video URI, present once `done` on success.
    pub video_uri: Option<String>,
    /// Failure message, present once `done` on failure.
    pub failure: Option<String>,
}

/// Result of one `generate` call: either immediate content (Text/Image)
/// or a long-running operation handle (Video).
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
    Content(ModelContent),
    Operation(VideoOperation),
}

/// The generative backend collaborator.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Rewrites `raw_input` into an optimized prompt under the given
    /// instruction payload.
    async fn optimize(
        &self,
        raw_input: &str,
        instructions: &InstructionPayload,
    ) -> Result<String, GatewayError>;

    /// Runs `prompt` against the backend for `mode`. Video submissions
    /// return an operation handle to be polled; Text/Image return content
    /// directly.
    async fn generate(
        &self,
        prompt: &str,
        mode: GenerationMode,
        aspect_ratio: AspectRatio,
    ) -> Result<GenerationResponse, GatewayError>;

    /// Fetches the current status of an in-flight video operation.
    async fn poll_operation(&self, operation: &VideoOperation)
    -> Result<VideoOperation, GatewayError>;

    /// Critiques a generated image against the prompt that produced it.
    async fn analyze(&self, image: &InlinePayload, prompt: &str) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: ModelGateway + ?Sized> ModelGateway for std::sync::Arc<T> {
    async fn optimize(
        &self,
        raw_input: &str,
        instructions: &InstructionPayload,
    ) -> Result<String, GatewayError> {
        (**self).optimize(raw_input, instructions).await
    }

    async fn generate(
        &self,
        prompt: &str,
        mode: GenerationMode,
        aspect_ratio: AspectRatio,
    ) -> Result<GenerationResponse, GatewayError> {
        (**self).generate(prompt, mode, aspect_ratio).await
    }

    async fn poll_operation(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, GatewayError> {
        (**self).poll_operation(operation).await
    }

    async fn analyze(&self, image: &InlinePayload, prompt: &str) -> Result<String, GatewayError> {
        (**self).analyze(image, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trip() {
        let payload = InlinePayload {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo".to_string(),
        };

        let uri = payload.to_data_uri();
        assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo");
        assert_eq!(InlinePayload::from_data_uri(&uri), Some(payload));
    }

    #[test]
    fn test_from_data_uri_rejects_malformed_input() {
        assert!(InlinePayload::from_data_uri("not a uri").is_none());
        assert!(InlinePayload::from_data_uri("data:image/png,raw-no-base64").is_none());
        assert!(InlinePayload::from_data_uri("data:;base64,AAAA").is_none());
        assert!(InlinePayload::from_data_uri("data:image/png;base64,").is_none());
    }
}
