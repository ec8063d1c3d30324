//! Generation configuration: target mode, optimization framework, tone,
//! and the forced-default coupling between them.

use serde::{Deserialize, Serialize};

/// Which backend modality a prompt is being crafted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    Text,
    Image,
    Video,
}

impl GenerationMode {
    /// Image and Video share the visual defaults and directives.
    pub fn is_visual(&self) -> bool {
        matches!(self, GenerationMode::Image | GenerationMode::Video)
    }

    /// Human-readable label, used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationMode::Text => "Text / Chat",
            GenerationMode::Image => "Image Generation",
            GenerationMode::Video => "Video Generation",
        }
    }
}

/// Prompt-optimization framework handed to the optimizer collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationFramework {
    /// Context, Objective, Style, Tone, Audience, Response.
    CoStar,
    /// Concise, Logical, Explicit, Adaptive, Reflective.
    Clear,
    /// Visuals, Illumination, Subject, Usage, Angles, Lenses.
    Visual,
    /// Period, Authenticity, Wares, Ethnography, Setting.
    Historical,
}

/// Output tone requested from the optimizer collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Creative,
    Cinematic,
    HyperReal,
    Whimsical,
    Authentic,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Creative => "Creative",
            Tone::Cinematic => "Cinematic",
            Tone::HyperReal => "Hyper-Realistic",
            Tone::Whimsical => "Whimsical",
            Tone::Authentic => "Historically Authentic",
        }
    }
}

/// Output aspect ratio. Only the two ratios the video backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    /// The positional trailing flag appended by the assembler.
    pub fn as_flag(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "--ar 16:9",
            AspectRatio::Portrait => "--ar 9:16",
        }
    }
}

/// Global generation configuration for one session.
///
/// `framework` and `tone` are coupled to `mode`: any mode transition forces
/// them back to the mode-appropriate defaults via [`on_mode_change`]. This
/// is an invariant, not a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub mode: GenerationMode,
    pub framework: OptimizationFramework,
    pub tone: Tone,
    pub include_variables: bool,
    /// Terms the optimizer must structurally exclude. Empty means none.
    #[serde(default)]
    pub negative_constraint: String,
    pub aspect_ratio: AspectRatio,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Text,
            framework: OptimizationFramework::CoStar,
            tone: Tone::Professional,
            include_variables: false,
            negative_constraint: "CGI, 3D render, cartoon, anime, drawing, painting, bad quality"
                .to_string(),
            aspect_ratio: AspectRatio::Widescreen,
        }
    }
}

/// Applies the mode-transition invariant and returns the adjusted config.
///
/// Visual modes (Image/Video) force `Visual`/`Cinematic`; Text forces
/// `CoStar`/`Professional`. The rest of the config is carried over.
pub fn on_mode_change(config: &GenerationConfig, new_mode: GenerationMode) -> GenerationConfig {
    let mut next = config.clone();
    next.mode = new_mode;
    if new_mode.is_visual() {
        next.framework = OptimizationFramework::Visual;
        next.tone = Tone::Cinematic;
    } else {
        next.framework = OptimizationFramework::CoStar;
        next.tone = Tone::Professional;
    }
    next
}

/// Secret configuration loaded from secret.json by the infrastructure layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Whether the key belongs to a billed project. Video generation
    /// requires a billable key.
    #[serde(default)]
    pub billing_enabled: bool,
}
