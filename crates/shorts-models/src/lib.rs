//! Shared data models for the Shorts Factory backend.
//!
//! This crate provides Serde-serializable types for:
//! - Scenarios and scene specs (with document validation)
//! - Completed scene assets
//! - Job submission requests and job records
//! - Progress events emitted by the pipeline

pub mod job;
pub mod job_status;
pub mod progress;
pub mod scenario;

// Re-export common types
pub use job::{JobId, JobMode, JobSubmission, SubmitJobRequest};
pub use job_status::{JobRecord, JobStatus};
pub use progress::{ProgressEvent, ProgressStage};
pub use scenario::{
    strip_code_fence, CompletedScene, Scenario, ScenarioParseError, ScenarioResult, SceneSpec,
};
