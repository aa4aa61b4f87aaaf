//! Remote service configuration.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AiError, AiResult};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_FAL_BASE_URL: &str = "https://fal.run";
pub const DEFAULT_FAL_IMAGE_MODEL: &str = "fal-ai/flux-pro/v1.1-ultra";
pub const DEFAULT_FAL_VIDEO_MODEL: &str = "fal-ai/kling-video/v1/standard/image-to-video";
pub const DEFAULT_TTS_BASE_URL: &str = "http://localhost:5050";

/// Configuration for the remote AI services.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Gemini API key
    pub gemini_api_key: String,
    /// Gemini model name
    pub gemini_model: String,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// fal.ai API key
    pub fal_key: String,
    /// fal.ai synchronous endpoint base URL
    pub fal_base_url: String,
    /// Text-to-image model path
    pub fal_image_model: String,
    /// Image-to-video model path
    pub fal_video_model: String,
    /// TTS sidecar base URL
    pub tts_base_url: String,
    /// HTTP timeout for remote calls (none by default)
    pub timeout: Option<Duration>,
}

impl AiConfig {
    /// Create config from environment variables.
    ///
    /// Fails with [`AiError::MissingCredential`] when `GEMINI_API_KEY` or
    /// `FAL_KEY` is absent or empty.
    pub fn from_env() -> AiResult<Self> {
        Ok(Self {
            gemini_api_key: required_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            fal_key: required_env("FAL_KEY")?,
            fal_base_url: std::env::var("FAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FAL_BASE_URL.to_string()),
            fal_image_model: std::env::var("FAL_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_FAL_IMAGE_MODEL.to_string()),
            fal_video_model: std::env::var("FAL_VIDEO_MODEL")
                .unwrap_or_else(|_| DEFAULT_FAL_VIDEO_MODEL.to_string()),
            tts_base_url: std::env::var("TTS_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_TTS_BASE_URL.to_string()),
            timeout: std::env::var("AI_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        })
    }

    /// Build the shared HTTP client for all remote services.
    pub fn http_client(&self) -> AiResult<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(AiError::Network)
    }
}

fn required_env(name: &str) -> AiResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AiError::MissingCredential(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_env_missing() {
        let err = required_env("SHORTS_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Missing credential: SHORTS_TEST_SURELY_UNSET_VARIABLE not set"
        );
    }
}
