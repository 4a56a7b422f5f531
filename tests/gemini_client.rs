//! Wire-level tests for the Gemini client against a mock HTTP server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use concierge::prompt;
use concierge::provider::types::GenerateContentRequest;
use concierge::provider::{generate_with_fallback, ChatBackend, GeminiClient, UpstreamError};

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(reqwest::Client::new(), &server.uri(), "test-key")
}

fn request() -> GenerateContentRequest {
    prompt::build_request(&[], "hi")
}

fn success_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn generate_extracts_and_trims_the_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("  Hello there.  ")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .generate("gemini-1.5-flash", &request())
        .await
        .unwrap();

    assert_eq!(reply, "Hello there.");
}

#[tokio::test]
async fn api_errors_carry_the_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "model not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate("gemini-1.5-pro", &request())
        .await
        .unwrap_err();

    match err {
        UpstreamError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model not found");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn non_json_error_bodies_are_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate("gemini-1.5-flash", &request())
        .await
        .unwrap_err();

    match err {
        UpstreamError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn empty_candidate_lists_count_as_no_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate("gemini-1.5-flash", &request())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::EmptyReply));
}

#[tokio::test]
async fn fallback_recovers_when_a_later_model_answers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/alpha:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "quota exhausted", "status": "RESOURCE_EXHAUSTED"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/beta:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let candidates = vec!["alpha".to_string(), "beta".to_string()];

    let reply = generate_with_fallback(&client, &candidates, &request())
        .await
        .unwrap();

    assert_eq!(reply, "recovered");
}
