//! Collaborator traits consumed by the pipeline.
//!
//! Each trait is a request/response contract: implementations return a usable
//! URL (or payload) or an error. Retries live in the caller.

use async_trait::async_trait;

use crate::error::AiResult;
use crate::types::{ImageRequest, RemoteVoice, VideoRequest};

/// Chat-completion language model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a prompt and return the model's free-text reply.
    async fn complete(&self, prompt: &str) -> AiResult<String>;
}

/// Text-to-image model.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate one image and return its URL.
    async fn generate_image(&self, request: &ImageRequest) -> AiResult<String>;
}

/// Image-to-video model.
#[async_trait]
pub trait VideoModel: Send + Sync {
    /// Animate an image and return the clip URL.
    async fn animate(&self, request: &VideoRequest) -> AiResult<String>;
}

/// Text-to-speech engine.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Synthesize speech and return the encoded audio (MP3).
    async fn synthesize(&self, text: &str, voice: &str, rate: &str) -> AiResult<Vec<u8>>;

    /// List every voice the engine offers.
    async fn list_voices(&self) -> AiResult<Vec<RemoteVoice>>;
}
