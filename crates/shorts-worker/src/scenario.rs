//! Scenario parsing: free-text ideas through the language model, or
//! pre-structured documents supplied by the user.

use std::sync::Arc;

use tracing::{debug, info};

use shorts_ai::ChatModel;
use shorts_models::{JobMode, Scenario, ScenarioParseError, ScenarioResult, SubmitJobRequest};

/// Number of scenes to ask the model for.
///
/// `target / midpoint(min, max)` with integer division, never below one.
/// The model is free to return a different count.
pub fn requested_scene_count(target_duration: u32, scene_min: u32, scene_max: u32) -> u32 {
    let midpoint = ((scene_min as u64 + scene_max as u64) / 2).max(1);
    ((target_duration as u64 / midpoint) as u32).max(1)
}

/// Build the scripting instruction for the language model.
///
/// Image generation is stateless per scene, so visual consistency has to be
/// carried lexically: every scene prompt must restate the master style and
/// the character attributes.
pub fn build_scenario_prompt(
    idea: &str,
    target_duration: u32,
    scene_min: u32,
    scene_max: u32,
) -> String {
    let num_scenes = requested_scene_count(target_duration, scene_min, scene_max);

    format!(
        r#"You are a world-class cinematographer and visual storytelling expert.

TASK: Break the idea below into {num_scenes} visual scenes for AI image and video generation.

IDEA:
{idea}

VISUAL CONSISTENCY RULES:
1. Define ONE master visual style for the whole video (for example "Cinematic 8k, photorealistic, warm golden hour lighting, film grain, shallow depth of field").
2. Identify the main character(s) and their FIXED attributes (for example "25-year-old woman with long red curly hair, green eyes, wearing an elegant blue silk dress").
3. REPEAT the master style and the character attributes inside EVERY scene's image_prompt. Each image is generated independently and remembers nothing about earlier scenes.
4. Each scene lasts {scene_min}-{scene_max} seconds.
5. Target total duration: about {target_duration} seconds.

Respond with a single JSON object in exactly this shape:
{{
  "master_style": "the master visual style",
  "character_attributes": "fixed character description, or an empty string if there are no characters",
  "total_duration": {target_duration},
  "scenes": [
    {{
      "scene_id": 1,
      "voiceover": "what the narrator says or the on-screen text",
      "image_prompt": "specific composition, lighting and camera angle, followed by the master style and character attributes",
      "duration": {scene_min}
    }}
  ]
}}

Example image_prompt:
"Wide shot of a young woman with long red curly hair and green eyes wearing an elegant blue silk dress, standing on a misty mountain peak at sunrise, looking at the horizon. Cinematic 8k, photorealistic, warm golden hour lighting, film grain, shallow depth of field."

Return the JSON now:"#
    )
}

/// Turns a submission into a validated [`Scenario`].
#[derive(Clone)]
pub struct ScenarioParser {
    chat: Arc<dyn ChatModel>,
}

impl ScenarioParser {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }

    /// Parse according to the submission mode. Never retried.
    pub async fn parse(&self, request: &SubmitJobRequest) -> ScenarioResult<Scenario> {
        match request.mode {
            JobMode::Idea => {
                let (min, max) = request.scene_duration_range();
                self.from_idea(&request.content, request.target_duration, min, max)
                    .await
            }
            JobMode::Manual => self.from_document(&request.content),
        }
    }

    /// Ask the language model for a scenario and validate its reply.
    pub async fn from_idea(
        &self,
        idea: &str,
        target_duration: u32,
        scene_min: u32,
        scene_max: u32,
    ) -> ScenarioResult<Scenario> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(ScenarioParseError::invalid_field(
                "content",
                "idea must not be empty",
            ));
        }

        let prompt = build_scenario_prompt(idea, target_duration, scene_min, scene_max);
        debug!(prompt_len = prompt.len(), "Requesting scenario");

        let reply = self
            .chat
            .complete(&prompt)
            .await
            .map_err(|e| ScenarioParseError::generation(e.to_string()))?;

        let scenario = Scenario::from_document(&reply)?;
        info!(
            scenes = scenario.scene_count(),
            requested = requested_scene_count(target_duration, scene_min, scene_max),
            "Scenario generated"
        );
        Ok(scenario)
    }

    /// Validate a user-supplied scenario document. No scene-count heuristic.
    pub fn from_document(&self, document: &str) -> ScenarioResult<Scenario> {
        let scenario = Scenario::from_document(document)?;
        info!(scenes = scenario.scene_count(), "Manual scenario accepted");
        Ok(scenario)
    }
}
