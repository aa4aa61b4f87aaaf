//! HTTP contract tests for the remote clients.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shorts_ai::{
    AiConfig, AiError, ChatModel, FalClient, GeminiClient, ImageModel, ImageRequest, SpeechModel,
    TtsClient, VideoModel, VideoRequest, VoiceCatalog,
};

fn config_for(server: &MockServer) -> AiConfig {
    AiConfig {
        gemini_api_key: "gemini-key".to_string(),
        gemini_model: "gemini-test".to_string(),
        gemini_base_url: server.uri(),
        fal_key: "fal-key".to_string(),
        fal_base_url: server.uri(),
        fal_image_model: "fal-ai/flux-pro/v1.1-ultra".to_string(),
        fal_video_model: "fal-ai/kling-video/v1/standard/image-to-video".to_string(),
        tts_base_url: server.uri(),
        timeout: None,
    }
}

#[tokio::test]
async fn gemini_returns_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(query_param("key", "gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "```json\n{}\n```" } ] } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = GeminiClient::new(&config, reqwest::Client::new());
    let text = client.complete("write a script").await.unwrap();
    assert_eq!(text, "```json\n{}\n```");
}

#[tokio::test]
async fn gemini_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = GeminiClient::new(&config, reqwest::Client::new());
    let err = client.complete("prompt").await.unwrap_err();
    assert!(matches!(err, AiError::RequestFailed(ref msg) if msg.contains("429")));
}

#[tokio::test]
async fn gemini_rejects_empty_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = GeminiClient::new(&config, reqwest::Client::new());
    let err = client.complete("prompt").await.unwrap_err();
    assert!(matches!(err, AiError::InvalidResponse(_)));
}

#[tokio::test]
async fn fal_image_posts_portrait_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fal-ai/flux-pro/v1.1-ultra"))
        .and(header("Authorization", "Key fal-key"))
        .and(body_partial_json(json!({
            "prompt": "a lighthouse",
            "image_size": { "width": 720, "height": 1280 },
            "num_images": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [ { "url": "https://cdn.example/img.jpg" } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = FalClient::new(&config, reqwest::Client::new());
    let url = client
        .generate_image(&ImageRequest::portrait("a lighthouse"))
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.example/img.jpg");
}

#[tokio::test]
async fn fal_image_without_images_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "images": [] })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = FalClient::new(&config, reqwest::Client::new());
    let err = client
        .generate_image(&ImageRequest::portrait("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::InvalidResponse(_)));
}

#[tokio::test]
async fn fal_video_returns_clip_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fal-ai/kling-video/v1/standard/image-to-video"))
        .and(body_partial_json(json!({
            "image_url": "https://cdn.example/img.jpg",
            "duration": "5",
            "aspect_ratio": "9:16"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": { "url": "https://cdn.example/clip.mp4" }
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = FalClient::new(&config, reqwest::Client::new());
    let url = client
        .animate(&VideoRequest::portrait_clip("https://cdn.example/img.jpg"))
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.example/clip.mp4");
}

#[tokio::test]
async fn tts_synthesize_returns_audio_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/synthesize"))
        .and(body_partial_json(json!({
            "text": "hello",
            "voice": "en-US-GuyNeural",
            "rate": "+0%"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(vec![0x49, 0x44, 0x33]),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = TtsClient::new(&config, reqwest::Client::new());
    let audio = client
        .synthesize("hello", "en-US-GuyNeural", "+0%")
        .await
        .unwrap();
    assert_eq!(audio, vec![0x49, 0x44, 0x33]);
}

#[tokio::test]
async fn voice_catalog_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "ShortName": "de-DE-KatjaNeural",
                "FriendlyName": "Microsoft Katja Online (Natural) - German (Germany)",
                "Gender": "Female",
                "Locale": "de-DE",
                "LocaleName": "German (Germany)"
            },
            {
                "ShortName": "en-US-GuyNeural",
                "FriendlyName": "Microsoft Guy Online (Natural) - English (United States)",
                "Gender": "Male",
                "Locale": "en-US",
                "LocaleName": "English (United States)"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let catalog = Arc::new(VoiceCatalog::new(Arc::new(TtsClient::new(
        &config,
        reqwest::Client::new(),
    ))));

    let (a, b) = tokio::join!(catalog.voices(), catalog.voices());
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a, b);
    assert_eq!(a[0].locale, "en-US");
    assert_eq!(a[1].locale, "de-DE");

    catalog.voices().await.unwrap();
}

#[tokio::test]
async fn voice_catalog_does_not_cache_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let catalog = VoiceCatalog::new(Arc::new(TtsClient::new(&config, reqwest::Client::new())));

    assert!(catalog.voices().await.is_err());
    assert!(catalog.voices().await.unwrap().is_empty());
}
