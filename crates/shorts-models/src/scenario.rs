//! Scenario and scene models.
//!
//! A scenario is the structured script produced either by the language model
//! or supplied directly by the user. Both sources go through the same
//! document validation before any scene is rendered.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ScenarioResult<T> = Result<T, ScenarioParseError>;

/// Errors raised while turning raw input into a [`Scenario`].
///
/// These abort the job they occur in and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioParseError {
    #[error("Malformed scenario document: {0}")]
    Malformed(String),

    #[error("Invalid scenario field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Scenario contains no scenes")]
    NoScenes,

    #[error("Duplicate scene_id {0}")]
    DuplicateSceneId(u32),

    #[error("Scenario generation failed: {0}")]
    Generation(String),
}

impl ScenarioParseError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }
}

/// One narrative unit of the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SceneSpec {
    /// Scene identifier, positive and unique within a scenario
    pub scene_id: u32,
    /// Narrator text or on-screen caption
    pub voiceover: String,
    /// Full text-to-image prompt (restates master style and character)
    pub image_prompt: String,
    /// Requested scene duration in seconds
    pub duration: u32,
}

/// Structured script for a whole video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Visual style repeated in every scene prompt
    pub master_style: String,
    /// Fixed character description (empty when there are no characters)
    #[serde(default)]
    pub character_attributes: String,
    /// Target total duration in seconds
    pub total_duration: u32,
    /// Scenes in narrative order
    pub scenes: Vec<SceneSpec>,
}

impl Scenario {
    /// Parse and validate a scenario JSON document.
    ///
    /// An optional Markdown code fence around the payload is stripped first.
    pub fn from_document(raw: &str) -> ScenarioResult<Self> {
        let payload = strip_code_fence(raw);
        let scenario: Scenario = serde_json::from_str(payload)
            .map_err(|e| ScenarioParseError::Malformed(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check the field constraints that serde cannot express.
    pub fn validate(&self) -> ScenarioResult<()> {
        if self.total_duration == 0 {
            return Err(ScenarioParseError::invalid_field(
                "total_duration",
                "must be positive",
            ));
        }

        if self.scenes.is_empty() {
            return Err(ScenarioParseError::NoScenes);
        }

        let mut seen = HashSet::with_capacity(self.scenes.len());
        for (idx, scene) in self.scenes.iter().enumerate() {
            if scene.scene_id == 0 {
                return Err(ScenarioParseError::invalid_field(
                    format!("scenes[{}].scene_id", idx),
                    "must be positive",
                ));
            }
            if !seen.insert(scene.scene_id) {
                return Err(ScenarioParseError::DuplicateSceneId(scene.scene_id));
            }
            if scene.voiceover.trim().is_empty() {
                return Err(ScenarioParseError::invalid_field(
                    format!("scenes[{}].voiceover", idx),
                    "must not be empty",
                ));
            }
            if scene.image_prompt.trim().is_empty() {
                return Err(ScenarioParseError::invalid_field(
                    format!("scenes[{}].image_prompt", idx),
                    "must not be empty",
                ));
            }
            if scene.duration == 0 {
                return Err(ScenarioParseError::invalid_field(
                    format!("scenes[{}].duration", idx),
                    "must be positive",
                ));
            }
        }

        Ok(())
    }

    /// Number of scenes in the scenario.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

/// A scene whose image and clip were both generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompletedScene {
    pub scene_id: u32,
    pub voiceover: String,
    pub image_url: String,
    pub video_url: String,
    pub duration: u32,
}

impl CompletedScene {
    pub fn new(spec: &SceneSpec, image_url: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            scene_id: spec.scene_id,
            voiceover: spec.voiceover.clone(),
            image_url: image_url.into(),
            video_url: video_url.into(),
            duration: spec.duration,
        }
    }
}

/// Strip a Markdown code fence (```` ```json ```` or ```` ``` ````) around a payload.
///
/// Text without a fence is returned trimmed. Prose before the opening fence and
/// after the closing one is dropped.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();

    let body = if let Some(start) = text.find("```json") {
        &text[start + "```json".len()..]
    } else if let Some(start) = text.find("```") {
        &text[start + "```".len()..]
    } else {
        return text;
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "master_style": "Cinematic 8k, photorealistic",
        "character_attributes": "Astronaut in a white suit",
        "total_duration": 30,
        "scenes": [
            {"scene_id": 1, "voiceover": "Dust everywhere.", "image_prompt": "Red dunes", "duration": 10},
            {"scene_id": 2, "voiceover": "Then, color.", "image_prompt": "A flower", "duration": 10}
        ]
    }"#;

    #[test]
    fn test_parse_plain_document() {
        let scenario = Scenario::from_document(DOCUMENT).unwrap();
        assert_eq!(scenario.scene_count(), 2);
        assert_eq!(scenario.scenes[0].scene_id, 1);
        assert_eq!(scenario.character_attributes, "Astronaut in a white suit");
    }

    #[test]
    fn test_parse_fenced_document() {
        let fenced = format!("Here you go:\n```json\n{}\n```\nEnjoy!", DOCUMENT);
        let scenario = Scenario::from_document(&fenced).unwrap();
        assert_eq!(scenario.total_duration, 30);

        let bare_fence = format!("```\n{}\n```", DOCUMENT);
        assert!(Scenario::from_document(&bare_fence).is_ok());
    }

    #[test]
    fn test_character_attributes_default_to_empty() {
        let doc = r#"{"master_style": "", "total_duration": 10,
            "scenes": [{"scene_id": 1, "voiceover": "v", "image_prompt": "p", "duration": 5}]}"#;
        let scenario = Scenario::from_document(doc).unwrap();
        assert_eq!(scenario.character_attributes, "");
        assert_eq!(scenario.master_style, "");
    }

    #[test]
    fn test_missing_scenes_is_malformed() {
        let doc = r#"{"master_style": "s", "total_duration": 10}"#;
        let err = Scenario::from_document(doc).unwrap_err();
        assert!(matches!(err, ScenarioParseError::Malformed(ref m) if m.contains("scenes")));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Scenario::from_document("not json at all").unwrap_err();
        assert!(matches!(err, ScenarioParseError::Malformed(_)));
    }

    #[test]
    fn test_empty_scene_list_rejected() {
        let doc = r#"{"master_style": "s", "total_duration": 10, "scenes": []}"#;
        assert_eq!(Scenario::from_document(doc).unwrap_err(), ScenarioParseError::NoScenes);
    }

    #[test]
    fn test_duplicate_scene_ids_rejected() {
        let doc = r#"{"master_style": "s", "total_duration": 10, "scenes": [
            {"scene_id": 3, "voiceover": "a", "image_prompt": "p", "duration": 5},
            {"scene_id": 3, "voiceover": "b", "image_prompt": "q", "duration": 5}]}"#;
        assert_eq!(
            Scenario::from_document(doc).unwrap_err(),
            ScenarioParseError::DuplicateSceneId(3)
        );
    }

    #[test]
    fn test_blank_fields_rejected() {
        let doc = r#"{"master_style": "s", "total_duration": 10, "scenes": [
            {"scene_id": 1, "voiceover": "  ", "image_prompt": "p", "duration": 5}]}"#;
        let err = Scenario::from_document(doc).unwrap_err();
        assert!(matches!(err, ScenarioParseError::InvalidField { ref field, .. } if field == "scenes[0].voiceover"));

        let doc = r#"{"master_style": "s", "total_duration": 10, "scenes": [
            {"scene_id": 0, "voiceover": "v", "image_prompt": "p", "duration": 5}]}"#;
        assert!(Scenario::from_document(doc).is_err());

        let doc = r#"{"master_style": "s", "total_duration": 0, "scenes": [
            {"scene_id": 1, "voiceover": "v", "image_prompt": "p", "duration": 5}]}"#;
        assert!(Scenario::from_document(doc).is_err());
    }

    #[test]
    fn test_strip_code_fence_without_fence() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
    }

    #[test]
    fn test_completed_scene_copies_spec_fields() {
        let spec = SceneSpec {
            scene_id: 4,
            voiceover: "Hello".into(),
            image_prompt: "p".into(),
            duration: 9,
        };
        let done = CompletedScene::new(&spec, "https://img", "https://vid");
        assert_eq!(done.scene_id, 4);
        assert_eq!(done.duration, 9);
        assert_eq!(done.video_url, "https://vid");
    }
}
