//! Progress sinks.

use async_trait::async_trait;

use shorts_models::ProgressEvent;

use crate::tracker::JobTracker;

/// Receiver of pipeline progress events.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn on_progress(&self, event: ProgressEvent);
}

/// Sink that writes events into one job's record.
#[derive(Clone)]
pub struct JobProgressSink {
    job_id: String,
    tracker: JobTracker,
}

impl JobProgressSink {
    pub fn new(job_id: impl Into<String>, tracker: JobTracker) -> Self {
        Self {
            job_id: job_id.into(),
            tracker,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

#[async_trait]
impl ProgressSink for JobProgressSink {
    async fn on_progress(&self, event: ProgressEvent) {
        self.tracker.apply_progress(&self.job_id, event).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::queue::JobQueue;
    use crate::store::MemoryJobStore;
    use shorts_models::SubmitJobRequest;

    #[tokio::test]
    async fn test_sink_updates_record() {
        let (queue, _rx) = JobQueue::bounded(1);
        let tracker = JobTracker::new(Arc::new(MemoryJobStore::new()), queue);
        let record = tracker.submit(SubmitJobRequest::idea("a")).await.unwrap();
        tracker.mark_processing(&record.job_id).await;

        let sink = tracker.progress_sink(&record.job_id);
        sink.on_progress(ProgressEvent::scene_started(2, 4)).await;

        let record = tracker.get_status(sink.job_id()).await.unwrap();
        assert_eq!(record.current_scene, 2);
        assert_eq!(record.total_scenes, 4);
        assert_eq!(record.progress, 50);
        assert_eq!(record.message, "Processing scene 3/4");
    }
}
