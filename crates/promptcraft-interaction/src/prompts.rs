//! Natural-language rendering of instruction payloads.
//!
//! The core layer decides WHICH directives apply; this module turns them
//! into the system-instruction and analysis texts the backend actually
//! receives.

use promptcraft_core::instructions::InstructionPayload;

/// Renders the optimizer system instruction for one payload.
///
/// Guideline numbering is stable: the negative-constraint slot collapses
/// to an empty line when no terms are listed, so guideline 6 stays
/// guideline 6 either way.
pub fn optimizer_system_instruction(payload: &InstructionPayload) -> String {
    let negative_line = payload.negative_directive.as_deref().unwrap_or("");
    format!(
        "{role}\n\
         Your goal is to take a raw, likely vague, user idea and rewrite it into a highly effective, structured prompt.\n\
         \n\
         CURRENT MODE: {mode}\n\
         \n\
         GUIDELINES:\n\
         1. {framework}\n\
         2. {tone}\n\
         3. {focus}\n\
         4. {placeholder}\n\
         5. {negative}\n\
         6. RETURN ONLY THE OPTIMIZED PROMPT. Do not include \"Here is your prompt\" or markdown code blocks wrapper. Just the raw text.",
        role = payload.role,
        mode = payload.mode_label,
        framework = payload.framework_directive,
        tone = payload.tone_directive,
        focus = payload.focus_directive,
        placeholder = payload.placeholder_directive,
        negative = negative_line,
    )
}

/// Renders the critique request sent alongside a generated image.
pub fn analysis_prompt(original_prompt: &str) -> String {
    format!(
        "Act as an Art Historian and QA Specialist.\n\
         Analyze the attached image which was generated from the prompt: \"{original_prompt}\".\n\
         \n\
         CRITIQUE FOCUS:\n\
         1. Historical Accuracy: Check Armor, Architecture, and Objects. Are they from the correct era/region?\n\
         2. Ethnicity vs. Setting: Does the character's ethnicity match the request? Is there accidental blending (e.g. Indian features in Egyptian setting)?\n\
         3. Visual Anomalies: Are there \"leaks\" where styles mix inappropriately?\n\
         \n\
         Provide a concise, bulleted analysis. Be critical."
    )
}
