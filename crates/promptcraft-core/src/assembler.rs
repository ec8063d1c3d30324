//! Prompt assembly: turns a [`SceneDescriptor`] into one provider-ready
//! prompt string.
//!
//! Pure and total: identical inputs always yield byte-identical output.
//! The trailing flags (`--ar`, `--motion`, duration, `--seed`, `--no`) are
//! appended in a fixed order after the comma-joined descriptive fragments.
//! Downstream consumers may parse those flags positionally, so the order is
//! a compatibility contract.

use crate::config::GenerationConfig;
use crate::scene::{SceneDescriptor, ShotFocus};

/// Which field group the prompt is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptGroup {
    World,
    Camera,
    Sequencing,
}

const WORLD_QUALITY_SUFFIX: &str = "photorealistic, raw style, 8k resolution, highly detailed";
const CINEMATIC_PREFIX: &str = "Cinematic, photorealistic";
const FOOTAGE_SUFFIX: &str = "8k resolution, raw footage";

/// Assembles the prompt for `group` from `descriptor` and `config`.
pub fn assemble(
    descriptor: &SceneDescriptor,
    group: PromptGroup,
    config: &GenerationConfig,
) -> String {
    let mut prompt = match group {
        PromptGroup::World => assemble_world(descriptor, config),
        PromptGroup::Camera => assemble_camera(descriptor, config),
        PromptGroup::Sequencing => assemble_sequencing(descriptor, config),
    };
    push_exclusion(&mut prompt, &config.negative_constraint);
    prompt
}

fn assemble_world(descriptor: &SceneDescriptor, config: &GenerationConfig) -> String {
    let w = &descriptor.world;
    let mut prompt = join_fragments(&[
        &w.visual_style,
        &w.race,
        &w.costume,
        &w.props,
        &w.period,
        &w.location,
        &w.story,
        &w.lighting,
        WORLD_QUALITY_SUFFIX,
    ]);
    push_aspect_ratio(&mut prompt, config);
    push_flag(&mut prompt, "seed", &w.seed);
    prompt
}

fn assemble_camera(descriptor: &SceneDescriptor, config: &GenerationConfig) -> String {
    let c = &descriptor.camera;
    let story = if c.story.is_empty() {
        &descriptor.world.story
    } else {
        &c.story
    };
    let mut prompt = join_fragments(&[
        CINEMATIC_PREFIX,
        story,
        &c.framing,
        &c.movement,
        &c.rig,
        &c.lens,
        &c.lighting,
        FOOTAGE_SUFFIX,
    ]);
    push_aspect_ratio(&mut prompt, config);
    push_duration(&mut prompt, &c.duration_secs);
    push_flag(&mut prompt, "seed", &c.seed);
    prompt
}

fn assemble_sequencing(descriptor: &SceneDescriptor, config: &GenerationConfig) -> String {
    let s = &descriptor.sequencing;
    let world_story = &descriptor.world.story;

    // The focus decides both the effective story and the default framing.
    let (story, default_framing) = match s.focus {
        ShotFocus::Transition => {
            let mut movement = s.motion.to_lowercase();
            if !s.direction.is_empty() {
                movement.push_str(&format!(" flying {}", s.direction));
            }
            (
                format!("Camera follows {movement}, transitioning to {world_story}"),
                "Dynamic POV, Fluid Camera",
            )
        }
        ShotFocus::Crowd => {
            let mut density = if s.density.is_empty() {
                "Massive Army".to_string()
            } else {
                s.density.clone()
            };
            if density.contains("Massive") && !s.altitude.is_empty() {
                density.push_str(&format!(", {}", s.altitude));
            }
            (
                format!("{density}, {world_story}"),
                "Extreme Wide Shot, Drone View",
            )
        }
        ShotFocus::Detail => (
            format!("Extreme detail close-up, {world_story}"),
            "Low Angle, Ground Level",
        ),
        ShotFocus::Hero => (world_story.clone(), "Wide Shot"),
    };

    let framing = if s.framing.is_empty() {
        default_framing
    } else {
        &s.framing
    };

    let mut prompt = join_fragments(&[
        CINEMATIC_PREFIX,
        &story,
        &s.atmosphere,
        framing,
        &s.altitude,
        &s.motion,
        FOOTAGE_SUFFIX,
    ]);
    push_aspect_ratio(&mut prompt, config);
    push_flag(&mut prompt, "motion", &s.strength);
    push_duration(&mut prompt, &s.duration_secs);
    push_flag(&mut prompt, "seed", &s.seed);
    prompt
}

/// Joins the surviving (non-empty) fragments with `", "`.
fn join_fragments(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_aspect_ratio(prompt: &mut String, config: &GenerationConfig) {
    prompt.push(' ');
    prompt.push_str(config.aspect_ratio.as_flag());
}

/// Appends ` --{name} {value}` when the source field is non-empty.
fn push_flag(prompt: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        prompt.push_str(&format!(" --{name} {value}"));
    }
}

/// Appends the parenthesized duration suffix, e.g. ` ( 5s )`.
fn push_duration(prompt: &mut String, seconds: &str) {
    if !seconds.is_empty() {
        prompt.push_str(&format!(" ( {seconds}s )"));
    }
}

/// Appends the trailing exclusion flag carrying the constraint verbatim.
fn push_exclusion(prompt: &mut String, negative_constraint: &str) {
    if !negative_constraint.is_empty() {
        prompt.push_str(&format!(" --no {negative_constraint}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AspectRatio, GenerationConfig};
    use crate::scene::{CameraWork, SequencingPlan, ShotFocus, WorldScene};

    fn bare_config() -> GenerationConfig {
        GenerationConfig {
            negative_constraint: String::new(),
            aspect_ratio: AspectRatio::Widescreen,
            ..GenerationConfig::default()
        }
    }

    fn descriptor_with_world(world: WorldScene) -> SceneDescriptor {
        SceneDescriptor {
            world,
            camera: CameraWork::default(),
            sequencing: SequencingPlan::default(),
        }
    }

    #[test]
    fn test_world_prompt_drops_empty_fragments_and_orders_flags() {
        let world = WorldScene {
            race: String::new(),
            costume: "Lamellar Armor, Heavy Silk Robes".to_string(),
            props: String::new(),
            period: "Medieval Era, 13th Century".to_string(),
            location: "Vast Steppe Grasslands".to_string(),
            visual_style: "Epic Historical Film".to_string(),
            lighting: "Cinematic Volumetric Lighting".to_string(),
            story: "A warrior rides".to_string(),
            seed: String::new(),
        };
        let descriptor = descriptor_with_world(world);

        let prompt = assemble(&descriptor, PromptGroup::World, &bare_config());

        assert_eq!(
            prompt,
            "Epic Historical Film, Lamellar Armor, Heavy Silk Robes, \
             Medieval Era, 13th Century, Vast Steppe Grasslands, A warrior rides, \
             Cinematic Volumetric Lighting, photorealistic, raw style, \
             8k resolution, highly detailed --ar 16:9"
        );
    }

    #[test]
    fn test_world_prompt_appends_seed_and_exclusion_last() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "A warrior rides".to_string();
        descriptor.world.seed = "42".to_string();
        let mut config = bare_config();
        config.negative_constraint = "blurry, watermark".to_string();

        let prompt = assemble(&descriptor, PromptGroup::World, &config);

        assert!(prompt.ends_with("--ar 16:9 --seed 42 --no blurry, watermark"));
    }

    #[test]
    fn test_camera_story_falls_back_to_world_story() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "soldiers marching".to_string();
        descriptor.camera.story = String::new();

        let prompt = assemble(&descriptor, PromptGroup::Camera, &bare_config());

        assert!(prompt.starts_with("Cinematic, photorealistic, soldiers marching, Wide Shot"));
        assert!(prompt.ends_with("8k resolution, raw footage --ar 16:9 ( 5s )"));
    }

    #[test]
    fn test_camera_own_story_wins_over_fallback() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "world story".to_string();
        descriptor.camera.story = "tight tracking shot of the khan".to_string();

        let prompt = assemble(&descriptor, PromptGroup::Camera, &bare_config());

        assert!(prompt.contains("tight tracking shot of the khan"));
        assert!(!prompt.contains("world story"));
    }

    #[test]
    fn test_sequencing_transition_builds_follow_story() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "the army below".to_string();
        descriptor.sequencing.focus = ShotFocus::Transition;
        descriptor.sequencing.motion = "Falcon Aerial Chase".to_string();
        descriptor.sequencing.direction = "East".to_string();
        descriptor.sequencing.framing = String::new();

        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &bare_config());

        assert!(prompt.contains(
            "Camera follows falcon aerial chase flying East, transitioning to the army below"
        ));
        assert!(prompt.contains("Dynamic POV, Fluid Camera"));
    }

    #[test]
    fn test_sequencing_crowd_density_and_default_framing() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "soldiers marching".to_string();
        descriptor.sequencing = SequencingPlan {
            focus: ShotFocus::Crowd,
            density: "Massive Army".to_string(),
            altitude: "High Aerial View".to_string(),
            framing: String::new(),
            ..SequencingPlan::default()
        };

        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &bare_config());

        assert!(prompt.contains("Massive Army, High Aerial View, soldiers marching"));
        assert!(prompt.contains("Extreme Wide Shot, Drone View"));
    }

    #[test]
    fn test_sequencing_crowd_defaults_density_when_empty() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "a lone rider".to_string();
        descriptor.sequencing.focus = ShotFocus::Crowd;
        descriptor.sequencing.density = String::new();
        descriptor.sequencing.altitude = String::new();

        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &bare_config());

        assert!(prompt.contains("Massive Army, a lone rider"));
    }

    #[test]
    fn test_sequencing_detail_and_hero_focus() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "the khan's armor".to_string();
        descriptor.sequencing.focus = ShotFocus::Detail;
        descriptor.sequencing.framing = String::new();

        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &bare_config());
        assert!(prompt.contains("Extreme detail close-up, the khan's armor"));
        assert!(prompt.contains("Low Angle, Ground Level"));

        descriptor.sequencing.focus = ShotFocus::Hero;
        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &bare_config());
        assert!(prompt.contains("the khan's armor"));
        assert!(prompt.contains("Wide Shot"));
    }

    #[test]
    fn test_sequencing_explicit_framing_wins() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.sequencing.focus = ShotFocus::Crowd;
        descriptor.sequencing.framing = "Dutch Angle".to_string();

        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &bare_config());

        assert!(prompt.contains("Dutch Angle"));
        assert!(!prompt.contains("Extreme Wide Shot, Drone View"));
    }

    #[test]
    fn test_sequencing_trailing_flag_order() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.world.story = "a duel at dawn".to_string();
        descriptor.sequencing.seed = "7".to_string();
        let mut config = bare_config();
        config.aspect_ratio = AspectRatio::Portrait;
        config.negative_constraint = "text".to_string();

        let prompt = assemble(&descriptor, PromptGroup::Sequencing, &config);

        // Contract: ar, motion strength, duration, seed, exclusion.
        assert!(prompt.ends_with("--ar 9:16 --motion 10 ( 10s ) --seed 7 --no text"));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let descriptor = SceneDescriptor::default();
        let config = GenerationConfig::default();

        let a = assemble(&descriptor, PromptGroup::Sequencing, &config);
        let b = assemble(&descriptor, PromptGroup::Sequencing, &config);

        assert_eq!(a, b);
    }
}
