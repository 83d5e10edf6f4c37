use httpmock::prelude::*;
use serde_json::json;

use mathchat::completion::{CompletionClient, CompletionError, OllamaClient};

#[tokio::test]
async fn generate_response_is_parsed() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model": "test-model", "stream": false}"#);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "model": "test-model",
                    "response": "General Kenobi!",
                    "done": true
                }));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), "test-model");
    let reply = client.complete("Hello there").await.unwrap();

    assert_eq!(reply, "General Kenobi!");
    mock.assert_async().await;
}

#[tokio::test]
async fn prompt_is_forwarded_verbatim() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"prompt": "what's 2-2 cats?"}"#);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"response": "no idea", "done": true}));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), "test-model");
    client.complete("what's 2-2 cats?").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("model exploded");
        })
        .await;

    let client = OllamaClient::new(server.base_url(), "test-model");
    let err = client.complete("Hello there").await.unwrap_err();

    match err {
        CompletionError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model exploded");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"unexpected": true}));
        })
        .await;

    let client = OllamaClient::new(server.base_url(), "test-model");
    let err = client.complete("Hello there").await.unwrap_err();
    assert!(matches!(err, CompletionError::Transport(_)));
}

#[test]
fn trailing_slash_in_base_url_is_tolerated() {
    // Construction only; the URL join is exercised by the async tests.
    let client = OllamaClient::new("http://localhost:11434/", "test-model");
    assert_eq!(client.model(), "test-model");
}
