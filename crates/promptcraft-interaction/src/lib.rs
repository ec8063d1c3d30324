//! Interaction layer for PromptCraft.
//!
//! Defines the [`gateway::ModelGateway`] boundary the orchestrator depends
//! on, the natural-language prompt rendering, and the Gemini REST client
//! implementing the boundary.

pub mod gateway;
pub mod gemini;
pub mod prompts;

pub use gateway::{
    GatewayError, GenerationResponse, InlinePayload, ModelContent, ModelGateway, VideoOperation,
};
pub use gemini::GeminiApiClient;
