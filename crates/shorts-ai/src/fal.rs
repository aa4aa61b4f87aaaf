//! fal.ai client for image generation and image-to-video.
//!
//! Uses the synchronous `fal.run` endpoint: the POST blocks until the
//! result is ready and returns the output URLs in the body.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::service::{ImageModel, VideoModel};
use crate::types::{ImageRequest, VideoRequest};

#[derive(Clone)]
pub struct FalClient {
    api_key: String,
    base_url: String,
    image_model: String,
    video_model: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    images: Vec<FalFile>,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    video: Option<FalFile>,
}

#[derive(Debug, Deserialize)]
struct FalFile {
    url: String,
}

impl FalClient {
    pub fn new(config: &AiConfig, client: Client) -> Self {
        Self {
            api_key: config.fal_key.clone(),
            base_url: config.fal_base_url.trim_end_matches('/').to_string(),
            image_model: config.fal_image_model.trim_matches('/').to_string(),
            video_model: config.fal_video_model.trim_matches('/').to_string(),
            client,
        }
    }

    async fn run<B, R>(&self, model: &str, body: &B) -> AiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, model);
        debug!(%url, "Submitting fal request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::request_failed(format!(
                "fal {} returned {}: {}",
                model, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AiError::invalid_response(format!("Failed to parse fal response: {}", e)))
    }
}

#[async_trait]
impl ImageModel for FalClient {
    async fn generate_image(&self, request: &ImageRequest) -> AiResult<String> {
        let response: ImageResponse = self.run(&self.image_model, request).await?;
        response
            .images
            .into_iter()
            .next()
            .map(|f| f.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AiError::invalid_response("fal image response had no images"))
    }
}

#[async_trait]
impl VideoModel for FalClient {
    async fn animate(&self, request: &VideoRequest) -> AiResult<String> {
        let response: VideoResponse = self.run(&self.video_model, request).await?;
        response
            .video
            .map(|f| f.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AiError::invalid_response("fal video response had no video"))
    }
}
