//! Clients for the remote generative-AI services.
//!
//! The pipeline only depends on the traits in [`service`]; the concrete
//! clients here talk to:
//! - Gemini `generateContent` for scenario scripting
//! - fal.ai for text-to-image and image-to-video
//! - an Edge-TTS sidecar for speech synthesis and the voice catalog

pub mod config;
pub mod error;
pub mod fal;
pub mod gemini;
pub mod service;
pub mod tts;
pub mod types;

pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use fal::FalClient;
pub use gemini::GeminiClient;
pub use service::{ChatModel, ImageModel, SpeechModel, VideoModel};
pub use tts::{group_voices, TtsClient, VoiceCatalog};
pub use types::{ImageRequest, RemoteVoice, Voice, VoiceLocale, VideoRequest};
