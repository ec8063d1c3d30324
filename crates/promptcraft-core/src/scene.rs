//! Structured scene descriptor edited by the user.
//!
//! Three sibling field groups under one session: World (what the scene is),
//! Camera (how it is shot), Sequencing (how shots connect). Camera and
//! Sequencing may fall back to the World story when their own is empty;
//! that fallback lives in the assembler, not here.

use serde::{Deserialize, Serialize};

/// World & authenticity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldScene {
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub costume: String,
    #[serde(default)]
    pub props: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub visual_style: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub seed: String,
}

impl Default for WorldScene {
    fn default() -> Self {
        Self {
            race: String::new(),
            costume: String::new(),
            props: String::new(),
            period: "Medieval Era, 13th Century".to_string(),
            location: "Vast Steppe Grasslands".to_string(),
            visual_style: "Epic Historical Film".to_string(),
            lighting: "Cinematic Volumetric Lighting".to_string(),
            story: String::new(),
            seed: String::new(),
        }
    }
}

/// Cinematography fields for a single shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraWork {
    #[serde(default)]
    pub framing: String,
    #[serde(default)]
    pub movement: String,
    #[serde(default)]
    pub rig: String,
    #[serde(default)]
    pub lens: String,
    #[serde(default)]
    pub lighting: String,
    /// Shot duration in seconds, kept as the user typed it.
    #[serde(default)]
    pub duration_secs: String,
    #[serde(default)]
    pub seed: String,
    /// Falls back to [`WorldScene::story`] when empty.
    #[serde(default)]
    pub story: String,
}

impl Default for CameraWork {
    fn default() -> Self {
        Self {
            framing: "Wide Shot".to_string(),
            movement: "Static Camera".to_string(),
            rig: "Steadicam Smooth".to_string(),
            lens: "35mm Lens".to_string(),
            lighting: "Cinematic Volumetric Lighting".to_string(),
            duration_secs: "5".to_string(),
            seed: String::new(),
            story: String::new(),
        }
    }
}

/// What a sequencing shot is for. Closed set; every consumer matches
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotFocus {
    Transition,
    Crowd,
    Detail,
    Hero,
}

/// Shot-sequencing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencingPlan {
    pub focus: ShotFocus,
    #[serde(default)]
    pub motion: String,
    /// Optional; the assembler derives a focus-specific default when empty.
    #[serde(default)]
    pub framing: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub altitude: String,
    #[serde(default)]
    pub density: String,
    #[serde(default)]
    pub atmosphere: String,
    /// Motion strength, numeric string.
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub duration_secs: String,
    #[serde(default)]
    pub seed: String,
}

impl Default for SequencingPlan {
    fn default() -> Self {
        Self {
            focus: ShotFocus::Transition,
            motion: "Falcon Aerial Chase".to_string(),
            framing: String::new(),
            direction: String::new(),
            altitude: String::new(),
            density: String::new(),
            atmosphere: "Battlefield Smoke".to_string(),
            strength: "10".to_string(),
            duration_secs: "10".to_string(),
            seed: String::new(),
        }
    }
}

/// The full structured descriptor for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    #[serde(default)]
    pub world: WorldScene,
    #[serde(default)]
    pub camera: CameraWork,
    #[serde(default)]
    pub sequencing: SequencingPlan,
}
