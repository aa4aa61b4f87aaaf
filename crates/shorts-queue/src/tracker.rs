//! Job tracker: the single owner of job record lifecycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shorts_models::{
    CompletedScene, JobId, JobRecord, JobSubmission, ProgressEvent, SubmitJobRequest,
};

use crate::error::{QueueError, QueueResult};
use crate::progress::JobProgressSink;
use crate::queue::JobQueue;
use crate::store::JobStore;

/// Maps job ids to records and feeds accepted submissions to the pool.
#[derive(Clone)]
pub struct JobTracker {
    store: Arc<dyn JobStore>,
    queue: JobQueue,
}

impl JobTracker {
    pub fn new(store: Arc<dyn JobStore>, queue: JobQueue) -> Self {
        Self { store, queue }
    }

    /// Register a queued record and hand the submission to the pool.
    ///
    /// If the queue refuses the submission the record is removed again, so a
    /// refused job is never visible to status polling.
    pub async fn submit(&self, request: SubmitJobRequest) -> QueueResult<JobRecord> {
        let job_id = JobId::new();
        let record = JobRecord::new(job_id.as_str());
        self.store.insert(record.clone()).await?;

        let mode = request.mode.as_str();
        if let Err(e) = self.queue.try_enqueue(JobSubmission::new(job_id.clone(), request)) {
            self.store.remove(job_id.as_str()).await;
            warn!(job_id = %job_id, "Submission refused: {}", e);
            return Err(e);
        }

        info!(job_id = %job_id, mode = %mode, "Job submitted");
        Ok(record)
    }

    /// Latest snapshot of a job.
    pub async fn get_status(&self, job_id: &str) -> QueueResult<JobRecord> {
        self.store
            .get(job_id)
            .await
            .ok_or_else(|| QueueError::not_found(job_id))
    }

    /// Forget a job. A running pipeline keeps going, but its later
    /// updates are discarded.
    pub async fn delete(&self, job_id: &str) -> QueueResult<JobRecord> {
        let removed = self
            .store
            .remove(job_id)
            .await
            .ok_or_else(|| QueueError::not_found(job_id))?;
        info!(job_id = %job_id, status = %removed.status, "Job deleted");
        Ok(removed)
    }

    /// Jobs queued or processing.
    pub async fn active_count(&self) -> usize {
        self.store.count_active().await
    }

    /// Move a job from queued to processing. Returns `false` if the record
    /// is gone or was not queued; the caller must then skip the job.
    pub async fn mark_processing(&self, job_id: &str) -> bool {
        self.mutate(job_id, Box::new(|r| r.start_processing())).await
    }

    pub async fn apply_progress(&self, job_id: &str, event: ProgressEvent) -> bool {
        self.mutate(job_id, Box::new(move |r| r.apply_progress(&event)))
            .await
    }

    pub async fn complete(&self, job_id: &str, videos: Vec<CompletedScene>) -> bool {
        self.mutate(job_id, Box::new(move |r| r.complete(videos))).await
    }

    pub async fn fail(&self, job_id: &str, error: impl Into<String>) -> bool {
        let error = error.into();
        self.mutate(job_id, Box::new(move |r| r.fail(error))).await
    }

    /// Progress sink bound to one job.
    pub fn progress_sink(&self, job_id: impl Into<String>) -> JobProgressSink {
        JobProgressSink::new(job_id, self.clone())
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    async fn mutate(&self, job_id: &str, mutation: crate::store::RecordMutation) -> bool {
        match self.store.update(job_id, mutation).await {
            Ok(changed) => changed,
            Err(QueueError::JobNotFound(_)) => {
                debug!(job_id = %job_id, "Dropping update for deleted job");
                false
            }
            Err(e) => {
                warn!(job_id = %job_id, "Job update failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryJobStore;
    use shorts_models::JobStatus;

    fn tracker(capacity: usize) -> (JobTracker, crate::queue::JobReceiver) {
        let (queue, rx) = JobQueue::bounded(capacity);
        (JobTracker::new(Arc::new(MemoryJobStore::new()), queue), rx)
    }

    #[tokio::test]
    async fn test_submit_creates_queued_record() {
        let (tracker, mut rx) = tracker(4);
        let record = tracker.submit(SubmitJobRequest::idea("a fox")).await.unwrap();

        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.progress, 0);
        let stored = tracker.get_status(&record.job_id).await.unwrap();
        assert_eq!(stored.job_id, record.job_id);

        let submission = rx.recv().await.unwrap();
        assert_eq!(submission.job_id.as_str(), record.job_id);
    }

    #[tokio::test]
    async fn test_refused_submission_leaves_no_record() {
        let (tracker, _rx) = tracker(1);
        tracker.submit(SubmitJobRequest::idea("one")).await.unwrap();

        let err = tracker.submit(SubmitJobRequest::idea("two")).await.unwrap_err();
        assert!(err.is_backpressure());
        assert_eq!(tracker.store().len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let (tracker, _rx) = tracker(1);
        assert_eq!(
            tracker.get_status("nope").await.unwrap_err(),
            QueueError::not_found("nope")
        );
        assert!(tracker.delete("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_updates_after_delete_are_dropped() {
        let (tracker, _rx) = tracker(2);
        let record = tracker.submit(SubmitJobRequest::idea("x")).await.unwrap();
        assert!(tracker.mark_processing(&record.job_id).await);

        tracker.delete(&record.job_id).await.unwrap();
        assert!(!tracker.complete(&record.job_id, Vec::new()).await);
        assert!(tracker.get_status(&record.job_id).await.is_err());
    }

    #[tokio::test]
    async fn test_lifecycle_and_active_count() {
        let (tracker, _rx) = tracker(4);
        let a = tracker.submit(SubmitJobRequest::idea("a")).await.unwrap();
        let b = tracker.submit(SubmitJobRequest::idea("b")).await.unwrap();
        assert_eq!(tracker.active_count().await, 2);

        assert!(tracker.mark_processing(&a.job_id).await);
        assert!(!tracker.mark_processing(&a.job_id).await);
        assert!(tracker.apply_progress(&a.job_id, ProgressEvent::scene_started(1, 2)).await);
        assert!(tracker.complete(&a.job_id, Vec::new()).await);
        assert!(tracker.fail(&b.job_id, "parse error").await);
        assert_eq!(tracker.active_count().await, 0);

        let a = tracker.get_status(&a.job_id).await.unwrap();
        assert_eq!(a.status, JobStatus::Completed);
        assert_eq!(a.progress, 100);

        let b = tracker.get_status(&b.job_id).await.unwrap();
        assert_eq!(b.error.as_deref(), Some("parse error"));
        assert!(!tracker.complete(&b.job_id, Vec::new()).await);
    }
}
