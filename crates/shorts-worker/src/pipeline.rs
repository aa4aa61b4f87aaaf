//! Pipeline orchestrator: parse, then render and animate each scene.

use std::sync::Arc;

use shorts_ai::{ChatModel, ImageModel, VideoModel};
use shorts_models::{
    CompletedScene, ProgressEvent, Scenario, ScenarioResult, SceneSpec, SubmitJobRequest,
};
use shorts_queue::ProgressSink;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::logging::JobLogger;
use crate::metrics;
use crate::scenario::ScenarioParser;
use crate::scene::{SceneAnimator, SceneRenderer};

/// Drives one job from submission to a list of completed scenes.
///
/// Scenes run strictly in narrative order. A scene that fails after its
/// retries is dropped and the next one is attempted; only a scenario parse
/// failure aborts the run.
#[derive(Clone)]
pub struct Pipeline {
    parser: ScenarioParser,
    renderer: SceneRenderer,
    animator: SceneAnimator,
}

impl Pipeline {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        images: Arc<dyn ImageModel>,
        videos: Arc<dyn VideoModel>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            parser: ScenarioParser::new(chat),
            renderer: SceneRenderer::new(images, config.scene_retry("render_scene")),
            animator: SceneAnimator::new(videos, config.scene_retry("animate_scene")),
        }
    }

    /// Parse the submission and produce every scene.
    pub async fn run(
        &self,
        request: &SubmitJobRequest,
        sink: &dyn ProgressSink,
        logger: &JobLogger,
    ) -> ScenarioResult<Vec<CompletedScene>> {
        let scenario = self.parser.parse(request).await?;
        logger.stage(&format!(
            "Scenario ready: {} scenes, style: {}",
            scenario.scene_count(),
            scenario.master_style
        ));
        Ok(self.produce(&scenario, sink, logger).await)
    }

    /// Render and animate every scene of an already validated scenario.
    pub async fn produce(
        &self,
        scenario: &Scenario,
        sink: &dyn ProgressSink,
        logger: &JobLogger,
    ) -> Vec<CompletedScene> {
        let total = scenario.scene_count() as u32;
        let mut completed = Vec::with_capacity(scenario.scenes.len());

        for (index, scene) in scenario.scenes.iter().enumerate() {
            sink.on_progress(ProgressEvent::scene_started(index as u32, total))
                .await;

            match self.produce_scene(scene, logger).await {
                Ok(result) => {
                    metrics::record_scene_completed();
                    completed.push(result);
                }
                Err(e) => {
                    metrics::record_scene_failed(e.stage());
                    logger.scene_dropped(scene.scene_id, &e.to_string());
                }
            }
        }

        sink.on_progress(ProgressEvent::complete(completed.len(), total))
            .await;
        completed
    }

    async fn produce_scene(
        &self,
        scene: &SceneSpec,
        logger: &JobLogger,
    ) -> WorkerResult<CompletedScene> {
        let image_url = self
            .renderer
            .render(scene.scene_id, &scene.image_prompt)
            .await?;
        logger.scene(scene.scene_id, "image ready");

        let video_url = self.animator.animate(scene.scene_id, &image_url).await?;
        logger.scene(scene.scene_id, "clip ready");

        Ok(CompletedScene::new(scene, image_url, video_url))
    }
}
