//! Worker metrics.
//!
//! Recorded through the `metrics` facade; the API binary installs the
//! Prometheus recorder that exports them.

use metrics::{counter, gauge, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_STARTED_TOTAL: &str = "shorts_jobs_started_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "shorts_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "shorts_jobs_failed_total";
    pub const JOBS_IN_PROGRESS: &str = "shorts_jobs_in_progress";
    pub const JOB_DURATION_SECONDS: &str = "shorts_job_duration_seconds";

    pub const SCENES_COMPLETED_TOTAL: &str = "shorts_scenes_completed_total";
    pub const SCENES_FAILED_TOTAL: &str = "shorts_scenes_failed_total";

    pub const REMOTE_RETRIES_TOTAL: &str = "shorts_remote_retries_total";
}

pub fn record_job_started() {
    counter!(names::JOBS_STARTED_TOTAL).increment(1);
    gauge!(names::JOBS_IN_PROGRESS).increment(1.0);
}

/// Record a finished job. `outcome` is the terminal status name.
pub fn record_job_finished(outcome: &'static str, duration_secs: f64) {
    gauge!(names::JOBS_IN_PROGRESS).decrement(1.0);
    match outcome {
        "failed" => counter!(names::JOBS_FAILED_TOTAL).increment(1),
        _ => counter!(names::JOBS_COMPLETED_TOTAL).increment(1),
    }
    histogram!(names::JOB_DURATION_SECONDS, "outcome" => outcome).record(duration_secs);
}

pub fn record_scene_completed() {
    counter!(names::SCENES_COMPLETED_TOTAL).increment(1);
}

/// `stage` is `render` or `animate`.
pub fn record_scene_failed(stage: &'static str) {
    counter!(names::SCENES_FAILED_TOTAL, "stage" => stage).increment(1);
}

pub fn record_retry(operation: &str) {
    counter!(names::REMOTE_RETRIES_TOTAL, "operation" => operation.to_string()).increment(1);
}
