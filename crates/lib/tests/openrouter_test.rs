//! # OpenRouter Provider Tests
//!
//! Runs the provider against a local `wiremock` server to check the request it
//! sends and how each failure mode is classified.

use carebot::{
    errors::ChatError,
    prompts::build_prompt,
    providers::ai::{ChatProvider, OpenRouterConfig, OpenRouterProvider},
};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, timeout_secs: u64) -> OpenRouterProvider {
    let mut config = OpenRouterConfig::with_api_key("test-key");
    config.api_url = format!("{}/api/v1/chat/completions", server.uri());
    config.timeout_secs = timeout_secs;
    OpenRouterProvider::new(config).expect("client should build")
}

#[tokio::test]
async fn test_successful_completion_is_trimmed() {
    // --- 1. Arrange ---
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(json!({
            "model": "nvidia/nemotron-3-nano-30b-a3b:free",
            "max_output_tokens": 350,
            "messages": [{ "role": "system" }, { "role": "user" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "  Visiting hours are 4 PM to 8 PM.\n" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // --- 2. Act ---
    let reply = provider_for(&server, 30)
        .complete(&build_prompt("", "What are visiting hours?"))
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(reply, "Visiting hours are 4 PM to 8 PM.");
}

#[tokio::test]
async fn test_non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = provider_for(&server, 30)
        .complete(&build_prompt("", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Api { status: 429, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_malformed_body_is_a_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "oops" })))
        .mount(&server)
        .await;

    let err = provider_for(&server, 30)
        .complete(&build_prompt("", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Malformed(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_empty_choices_and_blank_content_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "   " } }]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, 30);
    let first = provider.complete(&build_prompt("", "hi")).await.unwrap_err();
    let second = provider.complete(&build_prompt("", "hi")).await.unwrap_err();

    assert!(matches!(first, ChatError::Malformed(_)));
    assert!(matches!(second, ChatError::EmptyReply));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "role": "assistant", "content": "late" } }] }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server, 1)
        .complete(&build_prompt("", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)));
}
