//! Request/response types shared by the AI clients.

use serde::{Deserialize, Serialize};

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Portrait 9:16 frame used for short-form video.
    pub const PORTRAIT_720P: ImageSize = ImageSize {
        width: 720,
        height: 1280,
    };
}

/// Text-to-image request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub image_size: ImageSize,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub num_images: u32,
    pub enable_safety_checker: bool,
    pub output_format: String,
}

impl ImageRequest {
    /// Portrait request with the fixed sampling parameters used for scenes.
    pub fn portrait(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_size: ImageSize::PORTRAIT_720P,
            num_inference_steps: 28,
            guidance_scale: 3.5,
            num_images: 1,
            enable_safety_checker: true,
            output_format: "jpeg".to_string(),
        }
    }
}

/// Image-to-video request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub prompt: String,
    pub image_url: String,
    /// Clip length in seconds; the remote accepts "5" or "10"
    pub duration: String,
    pub aspect_ratio: String,
}

impl VideoRequest {
    pub const MOTION_PROMPT: &'static str = "Smooth camera movement, subtle motion, cinematic";

    /// Five-second portrait clip with the default motion prompt.
    pub fn portrait_clip(image_url: impl Into<String>) -> Self {
        Self {
            prompt: Self::MOTION_PROMPT.to_string(),
            image_url: image_url.into(),
            duration: "5".to_string(),
            aspect_ratio: "9:16".to_string(),
        }
    }
}

/// Voice entry as reported by the TTS sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteVoice {
    pub short_name: String,
    pub friendly_name: String,
    pub gender: String,
    pub locale: String,
    #[serde(default)]
    pub locale_name: Option<String>,
}

/// Voice exposed to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub name: String,
    pub display_name: String,
    pub gender: String,
    pub locale: String,
}

/// Voices grouped under one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceLocale {
    pub locale: String,
    pub language: String,
    pub voices: Vec<Voice>,
}
