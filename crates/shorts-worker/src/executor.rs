//! Job executor: a bounded worker pool fed by the submission queue.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn, Instrument};

use shorts_models::JobSubmission;
use shorts_queue::{JobReceiver, JobTracker};

use crate::config::WorkerConfig;
use crate::logging::JobLogger;
use crate::metrics;
use crate::pipeline::Pipeline;

const SHUTDOWN_MESSAGE: &str = "Service shutting down before the job started";

/// Pulls submissions off the queue and runs each in its own task, with at
/// most `max_concurrent_jobs` pipelines in flight.
pub struct JobExecutor {
    config: WorkerConfig,
    tracker: JobTracker,
    pipeline: Arc<Pipeline>,
    job_semaphore: Arc<Semaphore>,
    shutdown: watch::Sender<bool>,
}

impl JobExecutor {
    pub fn new(config: WorkerConfig, tracker: JobTracker, pipeline: Pipeline) -> Self {
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let (shutdown, _) = watch::channel(false);

        Self {
            config,
            tracker,
            pipeline: Arc::new(pipeline),
            job_semaphore,
            shutdown,
        }
    }

    /// Consume submissions until shutdown is signalled or the queue closes.
    ///
    /// On exit the queue is closed, submissions still waiting are failed,
    /// and in-flight jobs get up to `shutdown_timeout` to finish.
    pub async fn run(&self, mut receiver: JobReceiver) {
        info!(
            "Starting job executor with {} max concurrent jobs",
            self.config.max_concurrent_jobs
        );

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            let permit = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown_rx) => {
                    info!("Shutdown signal received, stopping executor");
                    break;
                }
                permit = self.job_semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let submission = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown_rx) => {
                    info!("Shutdown signal received, stopping executor");
                    break;
                }
                next = receiver.recv() => match next {
                    Some(submission) => submission,
                    None => {
                        info!("Submission queue closed, stopping executor");
                        break;
                    }
                },
            };

            let tracker = self.tracker.clone();
            let pipeline = Arc::clone(&self.pipeline);
            tokio::spawn(async move {
                let _permit = permit;
                Self::execute_job(tracker, pipeline, submission).await;
            });
        }

        receiver.close();
        while let Some(submission) = receiver.try_recv() {
            let job_id = submission.job_id.as_str();
            if self.tracker.fail(job_id, SHUTDOWN_MESSAGE).await {
                warn!(job_id = %job_id, "Dropped queued job on shutdown");
            }
        }

        info!("Waiting for in-flight jobs to complete...");
        if tokio::time::timeout(self.config.shutdown_timeout, self.wait_for_jobs())
            .await
            .is_err()
        {
            warn!(
                in_flight = self.in_flight(),
                "Shutdown timeout reached with jobs still running"
            );
        }

        info!("Job executor stopped");
    }

    /// Run one job to a terminal state.
    ///
    /// The pipeline runs in a child task so that a panic still leaves the
    /// record in `failed` rather than stuck in `processing`.
    async fn execute_job(tracker: JobTracker, pipeline: Arc<Pipeline>, submission: JobSubmission) {
        let logger = JobLogger::new(&submission.job_id, submission.request.mode);
        let span = logger.span();
        let job_id = submission.job_id.to_string();

        async move {
            if !tracker.mark_processing(&job_id).await {
                logger.skipped();
                return;
            }

            metrics::record_job_started();
            let started = Instant::now();
            logger.started(&format!(
                "{} s target, scenes {}-{} s",
                submission.request.target_duration,
                submission.request.scene_duration_min,
                submission.request.scene_duration_max
            ));

            let run = {
                let tracker = tracker.clone();
                let logger = logger.clone();
                let job_id = job_id.clone();
                tokio::spawn(
                    async move {
                        let sink = tracker.progress_sink(job_id);
                        pipeline.run(&submission.request, &sink, &logger).await
                    }
                    .in_current_span(),
                )
            };

            let outcome = match run.await {
                Ok(Ok(videos)) => {
                    let count = videos.len();
                    tracker.complete(&job_id, videos).await;
                    logger.finished(count);
                    "completed"
                }
                Ok(Err(e)) => {
                    logger.failed(&e.to_string());
                    tracker.fail(&job_id, e.to_string()).await;
                    "failed"
                }
                Err(e) => {
                    error!(job_id = %job_id, "Pipeline task aborted: {}", e);
                    tracker.fail(&job_id, "Internal error while processing job").await;
                    "failed"
                }
            };

            metrics::record_job_finished(outcome, started.elapsed().as_secs_f64());
        }
        .instrument(span)
        .await
    }

    async fn wait_for_jobs(&self) {
        while self.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Jobs currently holding a worker slot.
    pub fn in_flight(&self) -> usize {
        self.config.max_concurrent_jobs - self.job_semaphore.available_permits()
    }

    /// Signal shutdown. Sticks even when `run` has not subscribed yet.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
