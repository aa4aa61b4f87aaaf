//! Bounded submission queue feeding the worker pool.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use shorts_models::JobSubmission;

use crate::error::{QueueError, QueueResult};

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Submissions that may wait for a worker before new ones are refused
    pub capacity: usize,
    /// How long terminal records are kept after finishing
    pub job_ttl: Duration,
    /// Interval between eviction sweeps
    pub sweep_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            job_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            capacity: std::env::var("WORKER_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(64),
            job_ttl: Duration::from_secs(
                std::env::var("JOB_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            sweep_interval: Duration::from_secs(
                std::env::var("JOB_SWEEP_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|&n: &u64| n > 0)
                    .unwrap_or(60),
            ),
        }
    }
}

/// Producer half of the submission queue.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<JobSubmission>,
    capacity: usize,
}

/// Consumer half, owned by the worker pool.
pub struct JobReceiver {
    receiver: mpsc::Receiver<JobSubmission>,
}

impl JobQueue {
    /// Create a bounded queue with the given capacity.
    pub fn bounded(capacity: usize) -> (JobQueue, JobReceiver) {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        (JobQueue { sender, capacity }, JobReceiver { receiver })
    }

    /// Enqueue without waiting. Refuses when the queue is full or closed.
    pub fn try_enqueue(&self, submission: JobSubmission) -> QueueResult<()> {
        let job_id = submission.job_id.clone();
        match self.sender.try_send(submission) {
            Ok(()) => {
                debug!(job_id = %job_id, "Enqueued job");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(QueueError::QueueFull(self.capacity)),
            Err(TrySendError::Closed(_)) => Err(QueueError::Closed),
        }
    }

    /// Whether the consumer side is still accepting work.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Submissions currently waiting for a worker.
    pub fn pending(&self) -> usize {
        self.capacity - self.sender.capacity()
    }
}

impl JobReceiver {
    /// Next submission, or `None` once the queue is closed and drained.
    pub async fn recv(&mut self) -> Option<JobSubmission> {
        self.receiver.recv().await
    }

    /// Next submission if one is already waiting.
    pub fn try_recv(&mut self) -> Option<JobSubmission> {
        self.receiver.try_recv().ok()
    }

    /// Stop accepting submissions. Already-queued items can still be received.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::{JobId, SubmitJobRequest};

    fn submission() -> JobSubmission {
        JobSubmission::new(JobId::new(), SubmitJobRequest::idea("a fox"))
    }

    #[tokio::test]
    async fn test_full_queue_refuses() {
        let (queue, mut rx) = JobQueue::bounded(1);
        queue.try_enqueue(submission()).unwrap();
        assert_eq!(queue.pending(), 1);
        assert_eq!(
            queue.try_enqueue(submission()).unwrap_err(),
            QueueError::QueueFull(1)
        );

        assert!(rx.recv().await.is_some());
        assert!(queue.try_enqueue(submission()).is_ok());
    }

    #[tokio::test]
    async fn test_closed_queue_refuses_and_drains() {
        let (queue, mut rx) = JobQueue::bounded(4);
        queue.try_enqueue(submission()).unwrap();
        rx.close();

        assert!(!queue.is_open());
        assert_eq!(queue.try_enqueue(submission()).unwrap_err(), QueueError::Closed);
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.job_ttl, Duration::from_secs(3600));
    }
}
