//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Job queue is full (capacity {0})")]
    QueueFull(usize),

    #[error("Job queue is closed")]
    Closed,

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job already exists: {0}")]
    DuplicateJob(String),
}

impl QueueError {
    pub fn not_found(job_id: impl Into<String>) -> Self {
        Self::JobNotFound(job_id.into())
    }

    /// True when the submission was refused for lack of capacity.
    pub fn is_backpressure(&self) -> bool {
        matches!(self, QueueError::QueueFull(_) | QueueError::Closed)
    }
}
