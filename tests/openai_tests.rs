use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use coach_relay::build_app;
use coach_relay::config::AppConfig;
use coach_relay::services::openai::OpenAiProvider;
use coach_relay::services::provider::{ChatProvider, ProviderError};
use coach_relay::state::AppState;
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn test_sends_system_and_user_messages() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "You are a supportive mental coach."},
                {"role": "user", "content": "I'm tired"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Keep going!")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), "gpt-4o-mini");
    let reply = provider
        .complete("sk-test", "You are a supportive mental coach.", "I'm tired")
        .await
        .unwrap();

    assert_eq!(reply, "Keep going!");
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), "gpt-4o-mini");
    let err = provider.complete("bad", "sys", "hi").await.unwrap_err();

    match err {
        ProviderError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), "gpt-4o-mini");
    let err = provider.complete("sk-test", "sys", "hi").await.unwrap_err();

    assert!(err.to_string().contains("502"));
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), "gpt-4o-mini");
    let err = provider.complete("sk-test", "sys", "hi").await.unwrap_err();

    assert!(matches!(err, ProviderError::EmptyReply));
}

#[tokio::test]
async fn test_garbage_success_body_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::new(mock_server.uri(), "gpt-4o-mini");
    let err = provider.complete("sk-test", "sys", "hi").await.unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Nothing listens on port 9 locally.
    let provider = OpenAiProvider::new("http://127.0.0.1:9", "gpt-4o-mini");
    let err = provider.complete("sk-test", "sys", "hi").await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
}

#[tokio::test]
async fn test_end_to_end_through_router() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Breathe. You've got this.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = AppConfig {
        openai_api_key: Some("sk-test".to_string()),
        base_url: mock_server.uri(),
        ..Default::default()
    };
    let app = build_app(Arc::new(AppState::from_config(config)));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"message": "big exam tomorrow"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"reply": "Breathe. You've got this."}));
}
