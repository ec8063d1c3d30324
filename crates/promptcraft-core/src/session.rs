//! Session domain model.
//!
//! One [`GenerationSession`] holds everything the pipeline reads and
//! writes: the raw idea, the optimized prompt, the latest test/analysis
//! results, the scene descriptor, and the generation configuration. It is
//! passed explicitly to every stage; there is no ambient singleton.

use crate::config::{GenerationConfig, GenerationMode, on_mode_change};
use crate::error::Result;
use crate::scene::SceneDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fixed key under which the single session snapshot is persisted.
pub const SESSION_KEY: &str = "promptcraft_session_v1";

/// Whether the user edits a free-form prompt or the structured descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Raw,
    Structured,
}

/// Which output surface currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveView {
    Editor,
    Test,
}

/// Mutable state for one generation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSession {
    pub raw_input: String,
    pub optimized_output: String,
    /// Plain text, a `data:` image URI, a remote media URI, or an
    /// error/sentinel string. The UI renders it without a separate error
    /// channel.
    pub test_result: String,
    pub analysis_result: String,
    pub config: GenerationConfig,
    pub descriptor: SceneDescriptor,
    pub input_mode: InputMode,
    pub active_view: ActiveView,
    /// Bumped on every mode change. Stages record it before awaiting the
    /// gateway and refuse to write back if it moved on.
    pub epoch: u64,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self {
            raw_input: String::new(),
            optimized_output: String::new(),
            test_result: String::new(),
            analysis_result: String::new(),
            config: GenerationConfig::default(),
            descriptor: SceneDescriptor::default(),
            input_mode: InputMode::Raw,
            active_view: ActiveView::Editor,
            epoch: 0,
        }
    }
}

impl GenerationSession {
    /// Switches the generation mode, enforcing the coupled invariants:
    /// framework/tone forced defaults, stale result clearing, and the
    /// input-mode toggle (structured for Video, raw otherwise).
    ///
    /// A no-op when the mode is unchanged.
    pub fn apply_mode_change(&mut self, new_mode: GenerationMode) {
        if self.config.mode == new_mode {
            return;
        }
        self.config = on_mode_change(&self.config, new_mode);
        // Results from a different modality must never be shown again.
        self.test_result.clear();
        self.analysis_result.clear();
        self.input_mode = if new_mode == GenerationMode::Video {
            InputMode::Structured
        } else {
            InputMode::Raw
        };
        self.epoch += 1;
    }

    pub fn can_optimize(&self) -> bool {
        !self.raw_input.trim().is_empty()
    }

    pub fn can_test(&self) -> bool {
        !self.optimized_output.trim().is_empty()
    }

    /// Whether the current test result is an inline image, which is the
    /// precondition for the analyze stage.
    pub fn has_image_result(&self) -> bool {
        self.test_result.starts_with("data:image")
    }

    /// The persisted subset of the session. Test and analysis results are
    /// transient and deliberately excluded.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            descriptor: self.descriptor.clone(),
            config: self.config.clone(),
            raw_input: self.raw_input.clone(),
            optimized_output: self.optimized_output.clone(),
            input_mode: self.input_mode,
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuilds a session from a persisted snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            raw_input: snapshot.raw_input,
            optimized_output: snapshot.optimized_output,
            config: snapshot.config,
            descriptor: snapshot.descriptor,
            input_mode: snapshot.input_mode,
            ..Self::default()
        }
    }
}

/// Opaque persisted shape of a session, shared by the snapshot store and
/// file export/import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub descriptor: SceneDescriptor,
    pub config: GenerationConfig,
    pub raw_input: String,
    pub optimized_output: String,
    pub input_mode: InputMode,
    pub saved_at: String,
}

/// Persistence collaborator for the session snapshot.
///
/// The engine only ever stores one snapshot, keyed by [`SESSION_KEY`];
/// implementations decide where and how it lives.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted snapshot, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(snapshot))`: a snapshot exists and parsed cleanly
    /// - `Ok(None)`: nothing persisted yet
    /// - `Err(_)`: storage access or parse failure
    async fn load(&self) -> Result<Option<SessionSnapshot>>;

    /// Persists the snapshot, replacing any previous one.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Removes the persisted snapshot. Used by explicit session reset.
    async fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AspectRatio, OptimizationFramework, Tone};

    #[test]
    fn test_mode_switch_clears_stale_results() {
        let mut session = GenerationSession::default();
        session.apply_mode_change(GenerationMode::Video);
        session.test_result = "https://example.com/clip.mp4&key=abc".to_string();
        session.analysis_result = "fine".to_string();

        session.apply_mode_change(GenerationMode::Text);

        assert!(session.test_result.is_empty());
        assert!(session.analysis_result.is_empty());
        assert_eq!(session.config.framework, OptimizationFramework::CoStar);
        assert_eq!(session.config.tone, Tone::Professional);
    }

    #[test]
    fn test_mode_switch_forces_input_mode() {
        let mut session = GenerationSession::default();

        session.apply_mode_change(GenerationMode::Video);
        assert_eq!(session.input_mode, InputMode::Structured);

        session.apply_mode_change(GenerationMode::Image);
        assert_eq!(session.input_mode, InputMode::Raw);
    }

    #[test]
    fn test_mode_switch_bumps_epoch_and_same_mode_is_noop() {
        let mut session = GenerationSession::default();
        assert_eq!(session.epoch, 0);

        session.apply_mode_change(GenerationMode::Image);
        assert_eq!(session.epoch, 1);

        session.test_result = "kept".to_string();
        session.apply_mode_change(GenerationMode::Image);
        assert_eq!(session.epoch, 1);
        assert_eq!(session.test_result, "kept");
    }

    #[test]
    fn test_image_result_precondition() {
        let mut session = GenerationSession::default();
        assert!(!session.has_image_result());

        session.test_result = "No image generated.".to_string();
        assert!(!session.has_image_result());

        session.test_result = "data:image/png;base64,AAAA".to_string();
        assert!(session.has_image_result());
    }

    #[test]
    fn test_snapshot_round_trip_preserves_persisted_fields() {
        let mut session = GenerationSession::default();
        session.raw_input = "a steppe battle at dawn".to_string();
        session.optimized_output = "optimized".to_string();
        session.test_result = "transient".to_string();
        session.config.aspect_ratio = AspectRatio::Portrait;
        session.descriptor.world.story = "A warrior rides".to_string();
        session.apply_mode_change(GenerationMode::Video);

        let json = serde_json::to_string(&session.snapshot()).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = GenerationSession::from_snapshot(restored);

        assert_eq!(restored.raw_input, session.raw_input);
        assert_eq!(restored.optimized_output, session.optimized_output);
        assert_eq!(restored.config, session.config);
        assert_eq!(restored.descriptor, session.descriptor);
        assert_eq!(restored.input_mode, session.input_mode);
        // Transient results do not survive a round trip
        assert!(restored.test_result.is_empty());
    }
}
