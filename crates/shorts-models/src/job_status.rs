//! Job records for progress tracking and polling.
//!
//! A [`JobRecord`] is the snapshot returned to status-polling clients. All
//! mutators are no-ops once the record reaches a terminal state, so a job is
//! never resurrected.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::progress::{percent_of, ProgressEvent};
use crate::scenario::CompletedScene;

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued waiting for a worker
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// Job finished (possibly with fewer scenes than requested)
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable status of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobRecord {
    /// Unique job identifier
    pub job_id: String,
    /// Current job status
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Scenes attempted so far
    pub current_scene: u32,
    /// Scenes in the scenario (0 until parsed)
    pub total_scenes: u32,
    /// Human-readable status line
    pub message: String,
    /// Scenes that were fully rendered and animated
    pub videos: Vec<CompletedScene>,
    /// Error message if the job failed
    pub error: Option<String>,
    /// When the job was submitted
    pub created_at: DateTime<Utc>,
    /// When the record last changed
    pub updated_at: DateTime<Utc>,
    /// When the job reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Create a new queued record.
    pub fn new(job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            job_id: job_id.into(),
            status: JobStatus::Queued,
            progress: 0,
            current_scene: 0,
            total_scenes: 0,
            message: "Job queued".to_string(),
            videos: Vec::new(),
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move a queued job to processing.
    ///
    /// Returns `false` if the job was not queued.
    pub fn start_processing(&mut self) -> bool {
        if self.status != JobStatus::Queued {
            return false;
        }
        self.status = JobStatus::Processing;
        self.message = "Initializing...".to_string();
        self.updated_at = Utc::now();
        true
    }

    /// Apply a pipeline progress event.
    ///
    /// Counters and percentage only move forward. While processing the
    /// percentage stays below 100; the 100% mark is written by [`complete`].
    ///
    /// [`complete`]: JobRecord::complete
    pub fn apply_progress(&mut self, event: &ProgressEvent) -> bool {
        if self.is_terminal() {
            return false;
        }

        self.message = event.message.clone();
        self.updated_at = Utc::now();

        // Counters reach total together with progress 100, in `complete`
        if event.is_complete() {
            return true;
        }

        self.total_scenes = self.total_scenes.max(event.total);
        let current = event.current.min(self.total_scenes);
        self.current_scene = self.current_scene.max(current);
        let percent = percent_of(self.current_scene, self.total_scenes).min(99);
        self.progress = self.progress.max(percent);
        true
    }

    /// Mark job as completed with its (possibly partial) results.
    pub fn complete(&mut self, videos: Vec<CompletedScene>) -> bool {
        if self.is_terminal() {
            return false;
        }
        let now = Utc::now();
        self.message = format!("Completed {} scenes!", videos.len());
        self.videos = videos;
        self.current_scene = self.total_scenes;
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.updated_at = now;
        self.completed_at = Some(now);
        true
    }

    /// Mark job as failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        let now = Utc::now();
        let error = error.into();
        self.message = format!("Error: {}", error);
        self.error = Some(error);
        self.status = JobStatus::Failed;
        self.updated_at = now;
        self.completed_at = Some(now);
        true
    }
}
