//! Instruction selection: deterministic mapping from the generation
//! configuration to the structured payload handed to the optimizer
//! collaborator. No I/O; the natural-language rendering of this payload
//! belongs to the gateway layer.

use crate::config::{GenerationConfig, GenerationMode, OptimizationFramework};
use serde::{Deserialize, Serialize};

/// Structured directives for one optimize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionPayload {
    /// Role the optimizer should assume; depends only on the mode.
    pub role: &'static str,
    /// Mode label announced to the optimizer.
    pub mode_label: &'static str,
    /// Framework directive, selected from `(framework, is_visual)`.
    pub framework_directive: &'static str,
    /// Tone the optimized prompt should adopt.
    pub tone_directive: String,
    /// Mode-specific realism/composition guidance.
    pub focus_directive: &'static str,
    /// Whether to emit bracketed placeholders for variable content.
    pub placeholder_directive: &'static str,
    /// Hard exclusion constraint; `None` when no terms are listed.
    pub negative_directive: Option<String>,
}

/// Builds the instruction payload for `config`.
pub fn select_instructions(config: &GenerationConfig) -> InstructionPayload {
    let role = match config.mode {
        GenerationMode::Text => {
            "You are a world-class Prompt Engineer and AI Optimization Specialist."
        }
        GenerationMode::Video => {
            "You are an expert Video AI Director and Prompt Engineer for models like Google Veo, Sora, and Runway Gen-3."
        }
        GenerationMode::Image => {
            "You are an expert Art Director, Historian, and Generative Image Specialist for models like Gemini Image, Midjourney, and Flux."
        }
    };

    let mode_label = match config.mode {
        GenerationMode::Text => "TEXT/CHAT GENERATION",
        GenerationMode::Image => "IMAGE GENERATION",
        GenerationMode::Video => "VIDEO GENERATION",
    };

    let focus_directive = match config.mode {
        GenerationMode::Text => {
            "Ensure clarity, specificity, and constraints are explicitly defined."
        }
        GenerationMode::Video => {
            "Focus intensely on PHOTOREALISM. Use keywords like 'raw footage', 'shot on film', '4k', 'highly detailed', 'live action'. Avoid 'CGI', '3D render', 'synthetic' looks. Describe Lighting (e.g., cinematic, golden hour), Camera Angles, and Motion/Physics."
        }
        GenerationMode::Image => {
            "Focus on PHOTOREALISM and Composition. Use keywords like 'photograph', 'f/1.8', '8k', 'sharp focus', 'raw style'. IMPORTANT: Explicitly decouple the subject's Ethnicity from their Attire/Armor if they differ. Prevent generation bias."
        }
    };

    let placeholder_directive = if config.include_variables {
        "Identify dynamic parts of the prompt and replace them with placeholders like [INSERT_TOPIC]."
    } else {
        "Do not use placeholders unless absolutely necessary."
    };

    let negative_directive = if config.negative_constraint.is_empty() {
        None
    } else {
        // Phrased as a hard constraint: the optimizer must negate or
        // structurally exclude the listed terms, not soften them.
        Some(format!(
            "CRITICAL CONSTRAINT - STRICTLY AVOID / NEGATIVE PROMPT: \"{}\". Ensure the final prompt explicitly negates these elements or structures the description to exclude them entirely.",
            config.negative_constraint
        ))
    };

    InstructionPayload {
        role,
        mode_label,
        framework_directive: framework_directive(config.framework, config.mode.is_visual()),
        tone_directive: format!("Adopt a {} tone for the output.", config.tone.label()),
        focus_directive,
        placeholder_directive,
        negative_directive,
    }
}

fn framework_directive(framework: OptimizationFramework, is_visual: bool) -> &'static str {
    if is_visual && framework == OptimizationFramework::Visual {
        return "Use the VISUAL framework: Detail Visuals, Illumination (lighting), Subject, Usage (context/action), Angles (camera/viewpoint), and Lenses (depth/style).";
    }

    match framework {
        OptimizationFramework::CoStar => {
            "Use the CO-STAR framework: Define Context, Objective, Style, Tone, Audience, and Response format clearly."
        }
        OptimizationFramework::Clear => {
            "Use the CLEAR framework: Be Concise, Logical, Explicit, Adaptive, and Reflective."
        }
        OptimizationFramework::Visual => {
            "Use the VISUAL framework: Detail Visuals, Illumination, Subject, Usage, Angles, and Lenses."
        }
        OptimizationFramework::Historical => {
            "Use the HISTORICAL framework (Period, Authenticity, Wares, Ethnography, Setting): 1) Identify the target Era. 2) FACT-CHECK Wares: Ensure Armor, Weapons, and Clothing are historically accurate to the region/date, OR explicitly noted if they are cross-cultural imports (e.g. Western Plate in the East). 3) Ethnography: Describe physical ethnicity explicitly if it contradicts the typical setting to avoid AI stereotype bias. 4) Use precise historical nomenclature (e.g. 'Sallet' not 'Helmet')."
        }
    }
}
