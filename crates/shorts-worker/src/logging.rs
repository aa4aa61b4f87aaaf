//! Per-job log lines.
//!
//! Job id and submission mode live on the span returned by
//! [`JobLogger::span`]; events emitted inside it only add what is specific
//! to them.

use tracing::{error, info, info_span, warn, Span};

use shorts_models::{JobId, JobMode};

#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: JobId,
    mode: JobMode,
}

impl JobLogger {
    pub fn new(job_id: &JobId, mode: JobMode) -> Self {
        Self {
            job_id: job_id.clone(),
            mode,
        }
    }

    pub fn span(&self) -> Span {
        info_span!("job", job_id = %self.job_id, mode = %self.mode)
    }

    pub fn started(&self, detail: &str) {
        info!("Job started: {}", detail);
    }

    /// The record left `queued` before a worker picked it up.
    pub fn skipped(&self) {
        warn!("Job is no longer queued, skipping");
    }

    pub fn stage(&self, message: &str) {
        info!("{}", message);
    }

    pub fn finished(&self, scenes: usize) {
        info!(scenes, "Job completed: {} scenes produced", scenes);
    }

    pub fn failed(&self, reason: &str) {
        error!("Job failed: {}", reason);
    }

    pub fn scene(&self, scene_id: u32, message: &str) {
        info!(scene_id, "Scene {}: {}", scene_id, message);
    }

    pub fn scene_dropped(&self, scene_id: u32, reason: &str) {
        warn!(scene_id, "Scene {} dropped: {}", scene_id, reason);
    }
}
