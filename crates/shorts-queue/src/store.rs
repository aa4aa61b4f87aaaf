//! Job record storage.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use shorts_models::JobRecord;

use crate::error::{QueueError, QueueResult};

/// In-place mutation of a record. Returns whether the record changed.
pub type RecordMutation = Box<dyn FnOnce(&mut JobRecord) -> bool + Send>;

/// Keyed storage of job records.
///
/// Every mutation of a single record is atomic with respect to readers:
/// a reader sees the record either before or after a mutation, never halfway.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new record. Fails if the id is already present.
    async fn insert(&self, record: JobRecord) -> QueueResult<()>;

    /// Snapshot of a record.
    async fn get(&self, job_id: &str) -> Option<JobRecord>;

    /// Apply `mutation` to the record under the store's write lock.
    async fn update(&self, job_id: &str, mutation: RecordMutation) -> QueueResult<bool>;

    /// Remove a record, returning it.
    async fn remove(&self, job_id: &str) -> Option<JobRecord>;

    /// Number of records not yet in a terminal state.
    async fn count_active(&self) -> usize;

    /// Total number of records.
    async fn len(&self) -> usize;

    /// Drop terminal records that finished at least `ttl` before `now`.
    async fn evict_expired(&self, now: DateTime<Utc>, ttl: Duration) -> usize;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryJobStore {
    records: RwLock<HashMap<String, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, record: JobRecord) -> QueueResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.job_id) {
            return Err(QueueError::DuplicateJob(record.job_id));
        }
        records.insert(record.job_id.clone(), record);
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.records.read().await.get(job_id).cloned()
    }

    async fn update(&self, job_id: &str, mutation: RecordMutation) -> QueueResult<bool> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(job_id)
            .ok_or_else(|| QueueError::not_found(job_id))?;
        Ok(mutation(record))
    }

    async fn remove(&self, job_id: &str) -> Option<JobRecord> {
        self.records.write().await.remove(job_id)
    }

    async fn count_active(&self) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| !r.is_terminal())
            .count()
    }

    async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    async fn evict_expired(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| {
            if !record.is_terminal() {
                return true;
            }
            let finished = record.completed_at.unwrap_or(record.updated_at);
            finished
                .checked_add_signed(ttl)
                .map_or(true, |expires_at| expires_at > now)
        });
        before - records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryJobStore::new();
        store.insert(JobRecord::new("a")).await.unwrap();

        let record = store.get("a").await.unwrap();
        assert_eq!(record.job_id, "a");
        assert!(store.get("b").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = MemoryJobStore::new();
        store.insert(JobRecord::new("a")).await.unwrap();
        let err = store.insert(JobRecord::new("a")).await.unwrap_err();
        assert_eq!(err, QueueError::DuplicateJob("a".to_string()));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = MemoryJobStore::new();
        let err = store
            .update("missing", Box::new(|r| r.start_processing()))
            .await
            .unwrap_err();
        assert_eq!(err, QueueError::not_found("missing"));
    }

    #[tokio::test]
    async fn test_count_active_excludes_terminal() {
        let store = MemoryJobStore::new();
        store.insert(JobRecord::new("a")).await.unwrap();
        store.insert(JobRecord::new("b")).await.unwrap();
        store
            .update("b", Box::new(|r| r.fail("boom")))
            .await
            .unwrap();

        assert_eq!(store.count_active().await, 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_evict_only_expired_terminal_records() {
        let store = MemoryJobStore::new();
        store.insert(JobRecord::new("running")).await.unwrap();
        store.insert(JobRecord::new("done")).await.unwrap();
        store
            .update("done", Box::new(|r| r.complete(Vec::new())))
            .await
            .unwrap();

        let ttl = Duration::minutes(10);
        assert_eq!(store.evict_expired(Utc::now(), ttl).await, 0);

        let later = Utc::now() + Duration::minutes(11);
        assert_eq!(store.evict_expired(later, ttl).await, 1);
        assert!(store.get("done").await.is_none());
        assert!(store.get("running").await.is_some());
    }
}
