//! GeminiApiClient - Direct REST implementation of [`ModelGateway`].
//!
//! Talks to the Gemini generateContent and Veo predictLongRunning
//! endpoints without an SDK dependency.
//! Configuration priority: ~/.config/promptcraft/secret.json > environment variables

use crate::gateway::{
    GatewayError, GenerationResponse, InlinePayload, ModelContent, ModelGateway, VideoOperation,
};
use crate::prompts::{analysis_prompt, optimizer_system_instruction};
use async_trait::async_trait;
use promptcraft_core::config::{AspectRatio, GenerationMode};
use promptcraft_core::instructions::InstructionPayload;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
const VIDEO_RESOLUTION: &str = "720p";
const OPTIMIZER_TEMPERATURE: f32 = 0.7;

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    text_model: String,
    image_model: String,
    video_model: String,
}

impl GeminiApiClient {
    /// Creates a new client with the provided API key and default models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }

    /// Loads configuration from ~/.config/promptcraft/secret.json or
    /// environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/promptcraft/secret.json
    /// 2. Environment variable (GEMINI_API_KEY)
    pub fn try_from_secret() -> Result<Self, GatewayError> {
        if let Ok(storage) = promptcraft_infrastructure::SecretStorage::new() {
            if let Ok(secret_config) = storage.load() {
                if let Some(gemini) = secret_config.gemini {
                    let mut client = Self::new(gemini.api_key);
                    if let Some(model) = gemini.model_name {
                        client.text_model = model;
                    }
                    return Ok(client);
                }
            }
        }

        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            GatewayError::MissingApiKey(
                "GEMINI_API_KEY not found in ~/.config/promptcraft/secret.json or environment variables".into(),
            )
        })?;
        Ok(Self::new(api_key))
    }

    /// Overrides the text model after construction.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Overrides the image model after construction.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Overrides the video model after construction.
    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.video_model = model.into();
        self
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ModelContent, GatewayError> {
        let url = format!("{BASE_URL}/models/{model}:generateContent");
        let response = self.post_json(&url, request).await?;
        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Parse(err.to_string()))?;
        Ok(extract_content(parsed))
    }

    async fn post_json<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::Request(format!("Gemini API request failed: {err}")))?;

        check_status(response).await
    }
}

#[async_trait]
impl ModelGateway for GeminiApiClient {
    async fn optimize(
        &self,
        raw_input: &str,
        instructions: &InstructionPayload,
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content::from_text(raw_input)],
            system_instruction: Some(Content::from_text(&optimizer_system_instruction(
                instructions,
            ))),
            generation_config: Some(GenerationTuning {
                temperature: OPTIMIZER_TEMPERATURE,
            }),
        };

        tracing::debug!("[GeminiApiClient] optimize via {}", self.text_model);
        let content = self.generate_content(&self.text_model, &request).await?;
        content.text.ok_or(GatewayError::NoContent)
    }

    async fn generate(
        &self,
        prompt: &str,
        mode: GenerationMode,
        aspect_ratio: AspectRatio,
    ) -> Result<GenerationResponse, GatewayError> {
        match mode {
            GenerationMode::Video => {
                let request = VideoGenerationRequest {
                    instances: vec![VideoInstance {
                        prompt: prompt.to_string(),
                    }],
                    parameters: VideoParameters {
                        sample_count: 1,
                        resolution: VIDEO_RESOLUTION.to_string(),
                        aspect_ratio: aspect_ratio.label().to_string(),
                    },
                };

                let url = format!("{BASE_URL}/models/{}:predictLongRunning", self.video_model);
                tracing::debug!("[GeminiApiClient] submit video via {}", self.video_model);
                let response = self.post_json(&url, &request).await?;
                let parsed: OperationResponse = response
                    .json()
                    .await
                    .map_err(|err| GatewayError::Parse(err.to_string()))?;
                Ok(GenerationResponse::Operation(parsed.into_operation()))
            }
            GenerationMode::Image | GenerationMode::Text => {
                let model = if mode == GenerationMode::Image {
                    &self.image_model
                } else {
                    &self.text_model
                };
                let request = GenerateContentRequest {
                    contents: vec![Content::from_text(prompt)],
                    system_instruction: None,
                    generation_config: None,
                };

                tracing::debug!("[GeminiApiClient] generate via {model}");
                let content = self.generate_content(model, &request).await?;
                Ok(GenerationResponse::Content(content))
            }
        }
    }

    async fn poll_operation(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, GatewayError> {
        let url = format!("{BASE_URL}/{}", operation.name);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|err| GatewayError::Request(format!("Operation poll failed: {err}")))?;

        let response = check_status(response).await?;
        let parsed: OperationResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Parse(err.to_string()))?;
        Ok(parsed.into_operation())
    }

    async fn analyze(&self, image: &InlinePayload, prompt: &str) -> Result<String, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        }),
                    },
                    Part {
                        text: Some(analysis_prompt(prompt)),
                        inline_data: None,
                    },
                ],
            }],
            system_instruction: None,
            generation_config: None,
        };

        tracing::debug!("[GeminiApiClient] analyze via {}", self.text_model);
        let content = self.generate_content(&self.text_model, &request).await?;
        content.text.ok_or(GatewayError::NoContent)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
    Err(map_http_error(status, body))
}

fn map_http_error(status: StatusCode, body: String) -> GatewayError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    GatewayError::Http {
        status: status.as_u16(),
        message,
    }
}

fn extract_content(response: GenerateContentResponse) -> ModelContent {
    let mut content = ModelContent::default();
    let Some(candidate) = response.candidates.into_iter().next() else {
        return content;
    };
    let Some(body) = candidate.content else {
        return content;
    };

    let mut text_parts = Vec::new();
    for part in body.parts {
        if let Some(text) = part.text {
            text_parts.push(text);
        }
        if let Some(inline) = part.inline_data {
            content.inline.push(InlinePayload {
                mime_type: inline.mime_type,
                data: inline.data,
            });
        }
    }
    if !text_parts.is_empty() {
        content.text = Some(text_parts.join(""));
    }
    content
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationTuning>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn from_text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationTuning {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Serialize)]
struct VideoGenerationRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Serialize)]
struct VideoInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    sample_count: u32,
    resolution: String,
    aspect_ratio: String,
}

#[derive(Deserialize)]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<OperationResult>,
    #[serde(default)]
    error: Option<OperationError>,
}

impl OperationResponse {
    fn into_operation(self) -> VideoOperation {
        let video_uri = self
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .and_then(|v| v.uri);

        VideoOperation {
            name: self.name,
            done: self.done,
            video_uri,
            failure: self.error.map(|e| e.message),
        }
    }
}

#[derive(Deserialize)]
struct OperationError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoRef>,
}

#[derive(Deserialize)]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[allow(dead_code)]
    code: Option<u32>,
    #[allow(dead_code)]
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_collects_text_and_inline_data() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "A "},
                        {"text": "prompt"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let content = extract_content(parsed);

        assert_eq!(content.text.as_deref(), Some("A prompt"));
        assert_eq!(content.first_inline().unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_extract_content_handles_empty_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let content = extract_content(parsed);
        assert!(content.text.is_none());
        assert!(content.inline.is_empty());
    }

    #[test]
    fn test_pending_operation_parses_without_response_body() {
        let raw = r#"{"name": "models/veo/operations/op-1"}"#;
        let parsed: OperationResponse = serde_json::from_str(raw).unwrap();
        let operation = parsed.into_operation();

        assert_eq!(operation.name, "models/veo/operations/op-1");
        assert!(!operation.done);
        assert!(operation.video_uri.is_none());
        assert!(operation.failure.is_none());
    }

    #[test]
    fn test_finished_operation_yields_first_video_uri() {
        let raw = r#"{
            "name": "models/veo/operations/op-1",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://example.com/video1.mp4"}},
                        {"video": {"uri": "https://example.com/video2.mp4"}}
                    ]
                }
            }
        }"#;
        let parsed: OperationResponse = serde_json::from_str(raw).unwrap();
        let operation = parsed.into_operation();

        assert!(operation.done);
        assert_eq!(
            operation.video_uri.as_deref(),
            Some("https://example.com/video1.mp4")
        );
    }

    #[test]
    fn test_failed_operation_carries_error_message() {
        let raw = r#"{
            "name": "models/veo/operations/op-1",
            "done": true,
            "error": {"code": 400, "message": "prompt was blocked"}
        }"#;
        let parsed: OperationResponse = serde_json::from_str(raw).unwrap();
        let operation = parsed.into_operation();

        assert!(operation.done);
        assert_eq!(operation.failure.as_deref(), Some("prompt was blocked"));
    }

    #[test]
    fn test_map_http_error_prefers_structured_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        match err {
            GatewayError::Http { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "<html>502</html>".to_string());
        match err {
            GatewayError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>502</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_video_request_serializes_camel_case_parameters() {
        let request = VideoGenerationRequest {
            instances: vec![VideoInstance {
                prompt: "a falcon over the steppe".to_string(),
            }],
            parameters: VideoParameters {
                sample_count: 1,
                resolution: VIDEO_RESOLUTION.to_string(),
                aspect_ratio: AspectRatio::Portrait.label().to_string(),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["parameters"]["sampleCount"], 1);
        assert_eq!(json["parameters"]["resolution"], "720p");
        assert_eq!(json["parameters"]["aspectRatio"], "9:16");
    }
}
