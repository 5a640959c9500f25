//! Integration tests for the chat relay.
//!
//! Each test spawns the application on a random port with a mock provider
//! and drives it over real HTTP. Run with:
//! cargo test -p chat-relay-service --test chat

use chat_relay_service::config::RelayConfig;
use chat_relay_service::handlers::{MISSING_PROMPT_BODY, PROVIDER_FAILURE_BODY};
use chat_relay_service::models::Role;
use chat_relay_service::services::providers::mock::MockChatProvider;
use chat_relay_service::services::providers::ProviderError;
use chat_relay_service::startup::Application;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::{Arc, Once};
use std::time::Duration;

static ENV_SETUP: Once = Once::new();

fn test_config() -> RelayConfig {
    ENV_SETUP.call_once(|| {
        std::env::set_var("RELAY__PORT", "0"); // Random port
        std::env::set_var("GOOGLE_API_KEY", "test-api-key");
    });

    RelayConfig::load().expect("Failed to load config")
}

/// Spawn the application with the given provider and return its base URL.
async fn spawn_app(provider: Arc<MockChatProvider>) -> String {
    let config = test_config();
    let app = Application::build_with_provider(config, provider)
        .await
        .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://localhost:{}", port)
}

#[tokio::test]
async fn valid_prompt_returns_the_reply_verbatim() {
    let provider = Arc::new(MockChatProvider::with_reply("Hi there!"));
    let addr = spawn_app(provider.clone()).await;
    let client = Client::new();

    let response = client
        .post(&addr)
        .json(&json!({"prompt": "Hello", "history": []}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Hi there!");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn unusable_prompt_is_rejected_without_a_provider_call() {
    let provider = Arc::new(MockChatProvider::with_reply("unused"));
    let addr = spawn_app(provider.clone()).await;
    let client = Client::new();

    let bodies = [
        json!({"history": []}),
        json!({"prompt": ""}),
        json!({"prompt": 42}),
        json!({"prompt": ["Hello"]}),
        json!({"prompt": null}),
    ];

    for body in bodies {
        let response = client
            .post(&addr)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status().as_u16(), 400, "body: {}", body);
        assert_eq!(response.text().await.unwrap(), MISSING_PROMPT_BODY);
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn every_provider_failure_maps_to_the_same_generic_error() {
    let failures: Vec<(&str, fn() -> ProviderError)> = vec![
        ("network", || {
            ProviderError::NetworkError("connection refused".to_string())
        }),
        ("api", || {
            ProviderError::ApiError("Gemini API error 500 Internal Server Error".to_string())
        }),
        ("rate limit", || ProviderError::RateLimited),
        ("timeout", || ProviderError::Timeout),
        ("empty response", || ProviderError::EmptyResponse),
    ];

    for (name, failure) in failures {
        let provider = Arc::new(MockChatProvider::failing_with(failure));
        let addr = spawn_app(provider.clone()).await;

        let response = Client::new()
            .post(&addr)
            .json(&json!({"prompt": "Hi"}))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status().as_u16(), 500, "failure: {}", name);
        assert_eq!(
            response.text().await.unwrap(),
            PROVIDER_FAILURE_BODY,
            "failure: {}",
            name
        );
        assert_eq!(provider.calls(), 1);
    }
}

#[tokio::test]
async fn non_array_history_is_treated_as_empty() {
    let provider = Arc::new(MockChatProvider::with_reply("ok"));
    let addr = spawn_app(provider.clone()).await;
    let client = Client::new();

    for history in [json!("nonsense"), json!(7), Value::Null] {
        let response = client
            .post(&addr)
            .json(&json!({"prompt": "Hi", "history": history}))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status().as_u16(), 200);
    }

    let histories = provider.received_histories();
    assert_eq!(histories.len(), 3);
    assert!(histories.iter().all(|h| h.is_empty()));
}

#[tokio::test]
async fn malformed_history_entries_are_dropped() {
    let provider = Arc::new(MockChatProvider::with_reply("ok"));
    let addr = spawn_app(provider.clone()).await;

    let response = Client::new()
        .post(&addr)
        .json(&json!({
            "prompt": "Hi",
            "history": [
                {"role": "user", "parts": [{"text": "earlier question"}]},
                {"role": "alien", "parts": [{"text": "bad role"}]},
                42,
                {"role": "model"},
                {"role": "model", "parts": [{"text": "earlier answer"}]},
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);

    let histories = provider.received_histories();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].len(), 2);
    assert_eq!(histories[0][0].role, Role::User);
    assert_eq!(histories[0][0].parts[0].text, "earlier question");
    assert_eq!(histories[0][1].role, Role::Model);
    assert_eq!(histories[0][1].parts[0].text, "earlier answer");
}

#[tokio::test]
async fn identical_requests_each_reach_the_provider() {
    let provider = Arc::new(MockChatProvider::with_reply("same"));
    let addr = spawn_app(provider.clone()).await;
    let client = Client::new();

    for _ in 0..2 {
        let response = client
            .post(&addr)
            .json(&json!({"prompt": "Hello", "history": []}))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status().as_u16(), 200);
    }

    // No caching or coalescing: two requests, two provider calls.
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn responses_carry_a_correlation_id() {
    let provider = Arc::new(MockChatProvider::with_reply("ok"));
    let addr = spawn_app(provider.clone()).await;
    let client = Client::new();

    // An inbound id is echoed back unchanged.
    let response = client
        .post(&addr)
        .header("x-request-id", "relay-test-123")
        .json(&json!({"prompt": "Hi"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("relay-test-123")
    );

    // One is minted when the caller sends none.
    let response = client
        .post(&addr)
        .json(&json!({"prompt": "Hi"}))
        .send()
        .await
        .expect("Failed to send request");
    let minted = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("response should carry a request id");
    assert!(!minted.is_empty());
}

#[tokio::test]
async fn health_check_returns_ok() {
    let provider = Arc::new(MockChatProvider::with_reply("unused"));
    let addr = spawn_app(provider.clone()).await;

    let response = Client::new()
        .get(format!("{}/health", addr))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-relay-service");

    // Probes must not consume provider quota.
    assert_eq!(provider.calls(), 0);
}
