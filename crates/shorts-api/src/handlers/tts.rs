//! Text-to-speech proxy handlers.

use axum::extract::State;
use axum::http::{header, HeaderName};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shorts_ai::tts::{DEFAULT_RATE, DEFAULT_VOICE, PREVIEW_TEXT};
use shorts_ai::VoiceLocale;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

const AUDIO_FILENAME_HEADER: HeaderName = HeaderName::from_static("x-audio-filename");

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_rate() -> String {
    DEFAULT_RATE.to_string()
}

/// Body of a synthesis request.
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_rate")]
    pub rate: String,
}

/// Body of a preview request.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default = "default_voice")]
    pub voice: String,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceLocale>,
}

/// GET /tts/voices
///
/// The first call populates the catalog; later calls are served from it.
pub async fn list_voices(State(state): State<AppState>) -> ApiResult<Json<VoicesResponse>> {
    let voices = state.voices.voices().await?;
    Ok(Json(VoicesResponse {
        voices: voices.to_vec(),
    }))
}

/// POST /tts/synthesize
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> ApiResult<Response> {
    if request.text.trim().is_empty() {
        return Err(ApiError::bad_request("Text cannot be empty"));
    }

    let audio = state
        .speech()
        .synthesize(&request.text, &request.voice, &request.rate)
        .await?;
    metrics::record_tts_synthesized("synthesize");

    let filename = format!("{}.mp3", Uuid::new_v4());
    info!(voice = %request.voice, bytes = audio.len(), "Synthesized speech");
    Ok(audio_response(audio, filename))
}

/// POST /tts/preview
pub async fn preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> ApiResult<Response> {
    let audio = state
        .speech()
        .synthesize(PREVIEW_TEXT, &request.voice, DEFAULT_RATE)
        .await?;
    metrics::record_tts_synthesized("preview");

    let filename = format!(
        "preview_{}_{}.mp3",
        filename_safe(&request.voice),
        &Uuid::new_v4().simple().to_string()[..8]
    );
    Ok(audio_response(audio, filename))
}

fn audio_response(audio: Vec<u8>, filename: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
            (AUDIO_FILENAME_HEADER, filename),
        ],
        audio,
    )
        .into_response()
}

/// Voice names go into a header value, so keep only filename-safe characters.
fn filename_safe(voice: &str) -> String {
    voice
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
