//! Job identifiers and submission requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How the submitted content should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    /// Free-text idea, expanded into a scenario by the language model
    #[default]
    Idea,
    /// Pre-built scenario JSON document
    Manual,
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Idea => "idea",
            JobMode::Manual => "manual",
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_target_duration() -> u32 {
    60
}

fn default_scene_duration_min() -> u32 {
    8
}

fn default_scene_duration_max() -> u32 {
    15
}

/// Body of a job submission.
///
/// Only the numeric fields are checked at submission time; `content` is
/// parsed by the worker.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_duration_range"))]
pub struct SubmitJobRequest {
    #[serde(default)]
    pub mode: JobMode,

    pub content: String,

    #[serde(default = "default_target_duration")]
    #[validate(range(min = 1, max = 3600))]
    pub target_duration: u32,

    #[serde(default = "default_scene_duration_min")]
    #[validate(range(min = 1))]
    pub scene_duration_min: u32,

    #[serde(default = "default_scene_duration_max")]
    #[validate(range(min = 1))]
    pub scene_duration_max: u32,
}

fn validate_duration_range(request: &SubmitJobRequest) -> Result<(), ValidationError> {
    if request.scene_duration_min > request.scene_duration_max {
        let mut err = ValidationError::new("scene_duration_range");
        err.message = Some("scene_duration_min must not exceed scene_duration_max".into());
        return Err(err);
    }
    Ok(())
}

impl SubmitJobRequest {
    /// Create an idea-mode request with default durations.
    pub fn idea(content: impl Into<String>) -> Self {
        Self {
            mode: JobMode::Idea,
            content: content.into(),
            target_duration: default_target_duration(),
            scene_duration_min: default_scene_duration_min(),
            scene_duration_max: default_scene_duration_max(),
        }
    }

    /// Create a manual-mode request carrying a scenario document.
    pub fn manual(document: impl Into<String>) -> Self {
        Self {
            mode: JobMode::Manual,
            ..Self::idea(document)
        }
    }

    /// Set target duration and per-scene duration range.
    pub fn with_durations(mut self, target: u32, scene_min: u32, scene_max: u32) -> Self {
        self.target_duration = target;
        self.scene_duration_min = scene_min;
        self.scene_duration_max = scene_max;
        self
    }

    /// Per-scene duration range as `(min, max)` seconds.
    pub fn scene_duration_range(&self) -> (u32, u32) {
        (self.scene_duration_min, self.scene_duration_max)
    }
}

/// A submission as handed to the worker pool.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    pub job_id: JobId,
    pub request: SubmitJobRequest,
}

impl JobSubmission {
    pub fn new(job_id: JobId, request: SubmitJobRequest) -> Self {
        Self { job_id, request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: SubmitJobRequest = serde_json::from_str(r#"{"content": "An idea"}"#).unwrap();
        assert_eq!(req.mode, JobMode::Idea);
        assert_eq!(req.target_duration, 60);
        assert_eq!(req.scene_duration_range(), (8, 15));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_manual_mode() {
        let req: SubmitJobRequest =
            serde_json::from_str(r#"{"mode": "manual", "content": "{}"}"#).unwrap();
        assert_eq!(req.mode, JobMode::Manual);
    }

    #[test]
    fn test_request_rejects_inverted_range() {
        let req = SubmitJobRequest::idea("x").with_durations(30, 12, 8);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_rejects_zero_durations() {
        assert!(SubmitJobRequest::idea("x").with_durations(0, 8, 12).validate().is_err());
        assert!(SubmitJobRequest::idea("x").with_durations(30, 0, 12).validate().is_err());
    }

    #[test]
    fn test_job_id_roundtrip_as_string() {
        let id = JobId::from("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }
}
