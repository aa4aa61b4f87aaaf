//! Progress events emitted by the pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pipeline stage reported by a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    /// A scene is about to be rendered
    Processing,
    /// All scenes have been attempted
    Complete,
}

/// A single progress update for one job.
///
/// `current` counts scenes already attempted, so it is `0` for the first
/// scene and equals `total` only on the final `Complete` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    pub current: u32,
    pub total: u32,
    pub message: String,
}

impl ProgressEvent {
    /// Event emitted before scene `index` (0-based) starts.
    pub fn scene_started(index: u32, total: u32) -> Self {
        Self {
            stage: ProgressStage::Processing,
            current: index,
            total,
            message: format!("Processing scene {}/{}", index + 1, total),
        }
    }

    /// Final event once every scene has been attempted.
    pub fn complete(completed: usize, total: u32) -> Self {
        Self {
            stage: ProgressStage::Complete,
            current: total,
            total,
            message: format!("Completed {}/{} scenes", completed, total),
        }
    }

    /// Percentage for this event: `round(100 * current / total)`, held
    /// below 100 until the `Complete` event.
    pub fn percent(&self) -> u8 {
        match self.stage {
            ProgressStage::Processing => percent_of(self.current, self.total).min(99),
            ProgressStage::Complete => 100,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage == ProgressStage::Complete
    }
}

/// Rounded percentage of `current` over `total` (half rounds up).
pub fn percent_of(current: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let current = current.min(total) as u64;
    let total = total as u64;
    ((current * 100 + total / 2) / total) as u8
}
