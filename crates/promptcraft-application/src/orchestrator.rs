//! Generation pipeline orchestration.
//!
//! `GenerationOrchestrator` drives the three stages (optimize, test,
//! analyze) over one shared [`GenerationSession`]. Each stage snapshots
//! what it needs under a short lock, awaits the gateway without holding
//! it, and re-checks the session epoch before writing anything back. A
//! stage that lost the race discards its result instead of clobbering
//! state the user has since moved past.

use promptcraft_core::config::{GenerationConfig, GenerationMode};
use promptcraft_core::credential::CredentialGate;
use promptcraft_core::error::{PromptCraftError, Result};
use promptcraft_core::instructions::select_instructions;
use promptcraft_core::session::{ActiveView, GenerationSession};
use promptcraft_interaction::gateway::{
    GenerationResponse, InlinePayload, ModelGateway, VideoOperation,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLL_WAIT: Duration = Duration::from_secs(600);

const NO_TEXT_SENTINEL: &str = "No response generated.";
const NO_IMAGE_SENTINEL: &str = "No image generated. The model might have returned text instead.";
const ANALYSIS_FAILED_SENTINEL: &str = "Failed to analyze image.";

/// Status line to show while a test invocation is in flight.
pub fn progress_message(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Video => "Initializing Veo... This may take 1-2 minutes.",
        GenerationMode::Image => "Generating Image...",
        GenerationMode::Text => "Gemini is thinking...",
    }
}

/// Drives the optimize/test/analyze pipeline over a shared session.
///
/// Each stage is single-flight: a second invocation while the first is
/// still awaiting the gateway fails fast with `StageInFlight` instead of
/// queueing.
pub struct GenerationOrchestrator<G, C> {
    gateway: G,
    credentials: C,
    session: Arc<RwLock<GenerationSession>>,
    optimizing: AtomicBool,
    testing: AtomicBool,
    analyzing: AtomicBool,
    poll_interval: Duration,
    max_poll_wait: Duration,
}

impl<G, C> GenerationOrchestrator<G, C>
where
    G: ModelGateway,
    C: CredentialGate,
{
    pub fn new(gateway: G, credentials: C, session: Arc<RwLock<GenerationSession>>) -> Self {
        Self {
            gateway,
            credentials,
            session,
            optimizing: AtomicBool::new(false),
            testing: AtomicBool::new(false),
            analyzing: AtomicBool::new(false),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_wait: DEFAULT_MAX_POLL_WAIT,
        }
    }

    /// Overrides the video polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the overall video polling deadline.
    pub fn with_max_poll_wait(mut self, wait: Duration) -> Self {
        self.max_poll_wait = wait;
        self
    }

    pub fn session(&self) -> Arc<RwLock<GenerationSession>> {
        Arc::clone(&self.session)
    }

    /// Optimize stage: rewrites the raw idea into a structured prompt.
    ///
    /// On success the optimized output replaces the previous one, stale
    /// test/analysis results are cleared, and the editor view is focused.
    /// On gateway failure nothing is written; the previous output stays.
    pub async fn optimize(&self) -> Result<String> {
        let _guard = StageGuard::acquire(&self.optimizing, "optimize")?;

        let (raw_input, config, epoch) = {
            let session = self.session.read().await;
            if !session.can_optimize() {
                return Err(PromptCraftError::EmptyInput { field: "raw input" });
            }
            (
                session.raw_input.clone(),
                session.config.clone(),
                session.epoch,
            )
        };

        let instructions = select_instructions(&config);
        tracing::info!(
            "[GenerationOrchestrator] optimizing for {}",
            config.mode.label()
        );
        let outcome = self.gateway.optimize(&raw_input, &instructions).await;

        let mut session = self.session.write().await;
        if session.epoch != epoch {
            tracing::debug!("[GenerationOrchestrator] optimize result superseded, discarding");
            return Err(PromptCraftError::Superseded);
        }
        match outcome {
            Ok(text) => {
                session.optimized_output = text.clone();
                session.test_result.clear();
                session.analysis_result.clear();
                session.active_view = ActiveView::Editor;
                Ok(text)
            }
            Err(err) => {
                tracing::warn!("[GenerationOrchestrator] optimize failed: {err}");
                Err(PromptCraftError::OptimizeFailed(err.to_string()))
            }
        }
    }

    /// Test stage: runs the optimized prompt against the backend for the
    /// current mode.
    ///
    /// Gateway failures are folded into the test result as a renderable
    /// error string rather than propagated; only preconditions
    /// (`EmptyInput`, `MissingCredential`), re-entry, and supersession
    /// surface as errors.
    pub async fn test(&self) -> Result<String> {
        let _guard = StageGuard::acquire(&self.testing, "test")?;

        let (prompt, config, epoch) = {
            let mut session = self.session.write().await;
            if !session.can_test() {
                return Err(PromptCraftError::EmptyInput {
                    field: "optimized prompt",
                });
            }
            session.active_view = ActiveView::Test;
            session.analysis_result.clear();
            (
                session.optimized_output.clone(),
                session.config.clone(),
                session.epoch,
            )
        };

        tracing::info!("[GenerationOrchestrator] {}", progress_message(config.mode));
        let outcome = self.run_test_stage(&prompt, &config).await;

        let mut session = self.session.write().await;
        if session.epoch != epoch {
            tracing::debug!("[GenerationOrchestrator] test result superseded, discarding");
            return Err(PromptCraftError::Superseded);
        }
        let text = match outcome {
            Ok(text) => text,
            Err(PromptCraftError::MissingCredential) => {
                return Err(PromptCraftError::MissingCredential);
            }
            Err(err) => {
                tracing::warn!("[GenerationOrchestrator] test failed: {err}");
                test_failure_message(config.mode).to_string()
            }
        };
        session.test_result = text.clone();
        Ok(text)
    }

    /// Analyze stage: critiques the generated image against its prompt.
    ///
    /// Only available when the current test result is an inline image;
    /// anything else is rejected before the gateway is touched.
    pub async fn analyze(&self) -> Result<String> {
        let _guard = StageGuard::acquire(&self.analyzing, "analyze")?;

        let (image, prompt, epoch) = {
            let session = self.session.read().await;
            if !session.has_image_result() {
                return Err(PromptCraftError::AnalysisUnavailable);
            }
            let image = InlinePayload::from_data_uri(&session.test_result)
                .ok_or(PromptCraftError::AnalysisUnavailable)?;
            (image, session.optimized_output.clone(), session.epoch)
        };

        tracing::info!("[GenerationOrchestrator] analyzing image result");
        let outcome = self.gateway.analyze(&image, &prompt).await;

        let mut session = self.session.write().await;
        if session.epoch != epoch {
            tracing::debug!("[GenerationOrchestrator] analysis superseded, discarding");
            return Err(PromptCraftError::Superseded);
        }
        let text = match outcome {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("[GenerationOrchestrator] analysis failed: {err}");
                ANALYSIS_FAILED_SENTINEL.to_string()
            }
        };
        session.analysis_result = text.clone();
        Ok(text)
    }

    async fn run_test_stage(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        match config.mode {
            GenerationMode::Video => self.run_video_test(prompt, config).await,
            GenerationMode::Text | GenerationMode::Image => {
                let response = self
                    .gateway
                    .generate(prompt, config.mode, config.aspect_ratio)
                    .await
                    .map_err(|err| PromptCraftError::internal(err.to_string()))?;
                let GenerationResponse::Content(content) = response else {
                    return Err(PromptCraftError::internal(
                        "synchronous generation returned an operation handle",
                    ));
                };
                match config.mode {
                    GenerationMode::Text => {
                        Ok(content.text.unwrap_or_else(|| NO_TEXT_SENTINEL.to_string()))
                    }
                    _ => Ok(content
                        .first_inline()
                        .map(InlinePayload::to_data_uri)
                        .unwrap_or_else(|| NO_IMAGE_SENTINEL.to_string())),
                }
            }
        }
    }

    async fn run_video_test(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        // Video generation needs a billable key, checked before any
        // network traffic.
        let key = match self.credentials.billable_key().await {
            Some(key) => key,
            None => {
                tracing::info!("[GenerationOrchestrator] no billable key, requesting selection");
                self.credentials
                    .request_selection()
                    .await
                    .ok_or(PromptCraftError::MissingCredential)?
            }
        };

        let response = self
            .gateway
            .generate(prompt, GenerationMode::Video, config.aspect_ratio)
            .await
            .map_err(|err| PromptCraftError::internal(err.to_string()))?;
        let GenerationResponse::Operation(mut operation) = response else {
            return Err(PromptCraftError::internal(
                "video submission returned inline content",
            ));
        };

        let deadline = Instant::now() + self.max_poll_wait;
        while !operation.done {
            if Instant::now() >= deadline {
                return Err(PromptCraftError::internal("video generation timed out"));
            }
            tokio::time::sleep(self.poll_interval).await;
            operation = self.poll_once(&operation).await?;
        }

        if let Some(failure) = operation.failure {
            return Err(PromptCraftError::internal(failure));
        }
        let uri = operation
            .video_uri
            .ok_or_else(|| PromptCraftError::internal("no video URI returned"))?;
        // The playback URI needs the key appended to be fetchable.
        Ok(format!("{uri}&key={key}"))
    }

    async fn poll_once(&self, operation: &VideoOperation) -> Result<VideoOperation> {
        self.gateway
            .poll_operation(operation)
            .await
            .map_err(|err| PromptCraftError::internal(err.to_string()))
    }
}

fn test_failure_message(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Video => {
            "Error: Could not run the prompt. If using Video, ensure you have selected a Paid API Key."
        }
        _ => "Error: Could not run the prompt.",
    }
}

/// Single-flight guard for one pipeline stage.
struct StageGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> StageGuard<'a> {
    fn acquire(flag: &'a AtomicBool, stage: &'static str) -> Result<Self> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PromptCraftError::StageInFlight { stage });
        }
        Ok(Self { flag })
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
