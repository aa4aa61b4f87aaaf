//! Shorts generation worker.
//!
//! This crate provides:
//! - Scenario parsing (language-model ideas and manual documents)
//! - Per-scene render and animate steps with bounded retries
//! - The pipeline orchestrator with partial-failure tolerance
//! - A bounded worker pool with graceful shutdown

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod retry;
pub mod scenario;
pub mod scene;

pub use config::WorkerConfig;
pub use error::{AnimateError, RenderError, WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
pub use pipeline::Pipeline;
pub use retry::{retry_async, RetryConfig, RetryResult};
pub use scenario::{build_scenario_prompt, requested_scene_count, ScenarioParser};
pub use scene::{SceneAnimator, SceneRenderer};
