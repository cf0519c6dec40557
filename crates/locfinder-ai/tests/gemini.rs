//! Integration tests for GeminiClient using wiremock.

use locfinder_ai::{GeminiClient, TextGenerator, LOCATION_STEREOTYPE_PROMPT};
use locfinder_core::{EndpointsConfig, NetworkError, ServiceError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.0-flash-exp";

fn client(server: &MockServer) -> GeminiClient {
    let endpoints = EndpointsConfig {
        gemini_url: server.uri(),
        ..Default::default()
    };
    GeminiClient::new("test-key", MODEL, &endpoints).unwrap()
}

#[tokio::test]
async fn test_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", MODEL)))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Oh, you're from Cambridge. That means you probably own a tote bag."}]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .generate(LOCATION_STEREOTYPE_PROMPT, "Cambridge")
        .await
        .unwrap();

    assert!(text.starts_with("Oh, you're from Cambridge."));
}

#[tokio::test]
async fn test_generate_sends_prompt_with_location() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", MODEL)))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"text": "Rhyme it.\n\nLocation Input: Boston"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).generate("Rhyme it.", "Boston").await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_generate_no_text_is_empty_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let text = client(&server).generate("x", "Boston").await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_generate_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "API key not valid"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).generate("x", "Boston").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Network(NetworkError::HttpStatus { status: 403 })
    ));
    assert_eq!(err.to_string(), "HTTP error! status: 403");
}
