//! Text-to-speech client and the process-wide voice catalog.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::service::SpeechModel;
use crate::types::{RemoteVoice, Voice, VoiceLocale};

pub const DEFAULT_VOICE: &str = "en-US-GuyNeural";
pub const DEFAULT_RATE: &str = "+0%";
pub const PREVIEW_TEXT: &str = "Hello! This is a preview of my voice. I hope you like how I sound.";

/// Locale pinned to the top of the grouped catalog.
const PINNED_LOCALE: &str = "en-US";
const FRIENDLY_NAME_PREFIX: &str = "Microsoft Server Speech Text to Speech Voice ";

/// HTTP client for the Edge-TTS sidecar.
#[derive(Clone)]
pub struct TtsClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    text: &'a str,
    voice: &'a str,
    rate: &'a str,
}

impl TtsClient {
    pub fn new(config: &AiConfig, client: Client) -> Self {
        Self {
            base_url: config.tts_base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SpeechModel for TtsClient {
    async fn synthesize(&self, text: &str, voice: &str, rate: &str) -> AiResult<Vec<u8>> {
        let url = format!("{}/synthesize", self.base_url);
        debug!(%voice, %rate, text_len = text.len(), "Synthesizing speech");

        let response = self
            .client
            .post(&url)
            .json(&SynthesizeBody { text, voice, rate })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::request_failed(format!(
                "TTS service returned {}: {}",
                status, error_text
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AiError::invalid_response("TTS service returned no audio"));
        }
        Ok(bytes.to_vec())
    }

    async fn list_voices(&self) -> AiResult<Vec<RemoteVoice>> {
        let url = format!("{}/voices", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::request_failed(format!(
                "TTS voice listing returned {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AiError::invalid_response(format!("Failed to parse voice list: {}", e))
        })
    }
}

/// Group a flat voice list by locale.
///
/// Locales are sorted by language name with `en-US` moved to the front.
/// Voices keep their source order within a locale.
pub fn group_voices(voices: Vec<RemoteVoice>) -> Vec<VoiceLocale> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, VoiceLocale> = HashMap::new();

    for v in voices {
        let entry = grouped.entry(v.locale.clone()).or_insert_with(|| {
            order.push(v.locale.clone());
            VoiceLocale {
                locale: v.locale.clone(),
                language: v.locale_name.clone().unwrap_or_else(|| v.locale.clone()),
                voices: Vec::new(),
            }
        });
        entry.voices.push(Voice {
            display_name: display_name(&v.friendly_name, &v.locale),
            name: v.short_name,
            gender: v.gender,
            locale: v.locale,
        });
    }

    let mut result: Vec<VoiceLocale> = order
        .into_iter()
        .filter_map(|locale| grouped.remove(&locale))
        .collect();
    result.sort_by(|a, b| a.language.cmp(&b.language));

    if let Some(pos) = result.iter().position(|l| l.locale == PINNED_LOCALE) {
        let pinned = result.remove(pos);
        result.insert(0, pinned);
    }
    result
}

fn display_name(friendly_name: &str, locale: &str) -> String {
    let name = friendly_name
        .strip_prefix(FRIENDLY_NAME_PREFIX)
        .unwrap_or(friendly_name);
    name.replace(&format!("({}, ", locale), "(")
}

/// Lazily populated, process-wide voice catalog.
///
/// The first caller fetches and groups the list; concurrent callers wait on
/// the same fetch. A failed fetch is not cached.
pub struct VoiceCatalog {
    speech: Arc<dyn SpeechModel>,
    cache: OnceCell<Vec<VoiceLocale>>,
}

impl VoiceCatalog {
    pub fn new(speech: Arc<dyn SpeechModel>) -> Self {
        Self {
            speech,
            cache: OnceCell::new(),
        }
    }

    pub async fn voices(&self) -> AiResult<&[VoiceLocale]> {
        let voices = self
            .cache
            .get_or_try_init(|| async {
                let raw = self.speech.list_voices().await?;
                let grouped = group_voices(raw);
                info!(locales = grouped.len(), "Voice catalog populated");
                Ok::<_, AiError>(grouped)
            })
            .await?;
        Ok(voices.as_slice())
    }

    /// Speech engine backing this catalog.
    pub fn speech(&self) -> &Arc<dyn SpeechModel> {
        &self.speech
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(short: &str, locale: &str, locale_name: &str) -> RemoteVoice {
        RemoteVoice {
            short_name: short.to_string(),
            friendly_name: format!("{}({}, {})", FRIENDLY_NAME_PREFIX, locale, short),
            gender: "Female".to_string(),
            locale: locale.to_string(),
            locale_name: Some(locale_name.to_string()),
        }
    }

    #[test]
    fn test_group_voices_pins_en_us() {
        let grouped = group_voices(vec![
            voice("fr-FR-DeniseNeural", "fr-FR", "French (France)"),
            voice("en-US-GuyNeural", "en-US", "English (United States)"),
            voice("de-DE-KatjaNeural", "de-DE", "German (Germany)"),
            voice("en-GB-SoniaNeural", "en-GB", "English (United Kingdom)"),
            voice("en-US-JennyNeural", "en-US", "English (United States)"),
        ]);

        let locales: Vec<&str> = grouped.iter().map(|l| l.locale.as_str()).collect();
        assert_eq!(locales, vec!["en-US", "en-GB", "fr-FR", "de-DE"]);
        assert_eq!(grouped[0].voices.len(), 2);
        assert_eq!(grouped[0].voices[0].name, "en-US-GuyNeural");
    }

    #[test]
    fn test_group_voices_language_falls_back_to_locale() {
        let mut v = voice("ja-JP-NanamiNeural", "ja-JP", "");
        v.locale_name = None;
        let grouped = group_voices(vec![v]);
        assert_eq!(grouped[0].language, "ja-JP");
    }

    #[test]
    fn test_display_name_cleanup() {
        let name = display_name(
            "Microsoft Server Speech Text to Speech Voice (en-US, GuyNeural)",
            "en-US",
        );
        assert_eq!(name, "(GuyNeural)");
        assert_eq!(
            display_name("Microsoft Guy Online (Natural) - English", "en-US"),
            "Microsoft Guy Online (Natural) - English"
        );
    }
}
