//! Background eviction of finished job records.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

use crate::store::JobStore;

/// Periodically drops terminal records older than the configured TTL.
pub struct JobSweeper {
    store: Arc<dyn JobStore>,
    ttl: Duration,
    interval: Duration,
}

impl JobSweeper {
    pub fn new(store: Arc<dyn JobStore>, ttl: Duration, interval: Duration) -> Self {
        Self {
            store,
            ttl,
            interval,
        }
    }

    /// Run until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting job sweeper (ttl: {:?}, interval: {:?})",
            self.ttl, self.interval
        );

        let mut ticker = interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Job sweeper stopped");
                        break;
                    }
                }
            }
        }
    }

    /// Single eviction pass. Returns the number of evicted records.
    pub async fn sweep_once(&self) -> usize {
        let ttl = chrono::Duration::from_std(self.ttl)
            .unwrap_or_else(|_| chrono::Duration::days(36_500));
        let evicted = self.store.evict_expired(chrono::Utc::now(), ttl).await;
        if evicted > 0 {
            info!("Evicted {} finished jobs", evicted);
        } else {
            debug!("Job sweep found nothing to evict");
        }
        evicted
    }
}
