//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Image generation for one scene failed after every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scene {scene_id} render failed after {attempts} attempts: {message}")]
pub struct RenderError {
    pub scene_id: u32,
    pub attempts: u32,
    pub message: String,
}

/// Video generation for one scene failed after every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scene {scene_id} animation failed after {attempts} attempts: {message}")]
pub struct AnimateError {
    pub scene_id: u32,
    pub attempts: u32,
    pub message: String,
}

/// A scene that could not be produced. The pipeline drops it and moves on;
/// job-level failures are `ScenarioParseError`s.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Animate(#[from] AnimateError),
}

impl WorkerError {
    /// Stage label used for the scene failure metric.
    pub fn stage(&self) -> &'static str {
        match self {
            WorkerError::Render(_) => "render",
            WorkerError::Animate(_) => "animate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_failures_keep_their_stage() {
        let err = WorkerError::from(RenderError {
            scene_id: 2,
            attempts: 3,
            message: "timeout".to_string(),
        });
        assert_eq!(err.stage(), "render");
        assert_eq!(
            err.to_string(),
            "Scene 2 render failed after 3 attempts: timeout"
        );

        let err = WorkerError::from(AnimateError {
            scene_id: 4,
            attempts: 2,
            message: "queue stalled".to_string(),
        });
        assert_eq!(err.stage(), "animate");
        assert_eq!(
            err.to_string(),
            "Scene 4 animation failed after 2 attempts: queue stalled"
        );
    }
}
