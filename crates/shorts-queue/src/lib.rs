//! In-process job tracking.
//!
//! This crate provides:
//! - A job store trait with an in-memory TTL-evicting implementation
//! - A bounded submission queue feeding the worker pool
//! - Progress sinks that write pipeline events into job records

pub mod error;
pub mod progress;
pub mod queue;
pub mod store;
pub mod sweeper;
pub mod tracker;

pub use error::{QueueError, QueueResult};
pub use progress::{JobProgressSink, ProgressSink};
pub use queue::{JobQueue, JobReceiver, QueueConfig};
pub use store::{JobStore, MemoryJobStore, RecordMutation};
pub use sweeper::JobSweeper;
pub use tracker::JobTracker;
