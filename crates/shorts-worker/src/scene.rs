//! Per-scene remote steps: still image, then animated clip.

use std::sync::Arc;

use tracing::debug;

use shorts_ai::{ImageModel, ImageRequest, VideoModel, VideoRequest};

use crate::error::{AnimateError, RenderError};
use crate::retry::{retry_async, RetryConfig};

/// Visual prompt → portrait still image URL.
#[derive(Clone)]
pub struct SceneRenderer {
    images: Arc<dyn ImageModel>,
    retry: RetryConfig,
}

impl SceneRenderer {
    pub fn new(images: Arc<dyn ImageModel>, retry: RetryConfig) -> Self {
        Self { images, retry }
    }

    pub async fn render(&self, scene_id: u32, prompt: &str) -> Result<String, RenderError> {
        let request = ImageRequest::portrait(prompt);
        debug!(scene_id, "Rendering scene image");

        retry_async(&self.retry, || self.images.generate_image(&request))
            .await
            .map_failure(|e, attempts| RenderError {
                scene_id,
                attempts,
                message: e.to_string(),
            })
    }
}

/// Still image URL → short portrait clip URL.
#[derive(Clone)]
pub struct SceneAnimator {
    videos: Arc<dyn VideoModel>,
    retry: RetryConfig,
}

impl SceneAnimator {
    pub fn new(videos: Arc<dyn VideoModel>, retry: RetryConfig) -> Self {
        Self { videos, retry }
    }

    /// The clip length is fixed by the remote model, independent of the
    /// scene's requested duration.
    pub async fn animate(&self, scene_id: u32, image_url: &str) -> Result<String, AnimateError> {
        let request = VideoRequest::portrait_clip(image_url);
        debug!(scene_id, "Animating scene");

        retry_async(&self.retry, || self.videos.animate(&request))
            .await
            .map_failure(|e, attempts| AnimateError {
                scene_id,
                attempts,
                message: e.to_string(),
            })
    }
}
