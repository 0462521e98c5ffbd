//! Integration tests against a live chat-completion endpoint.
//!
//! These tests make real API calls.
//! Run with: CEREBRAS_API_KEY=your_key cargo test --test llm_integration -- --ignored

use std::sync::Arc;

use hindsight_forge::agents::{CompletionClient, CompletionOptions, CompletionOutput};
use hindsight_forge::dataset::{roleplay_from_value, OutcomePolarity, ScenarioRequest, ValidationMode};
use hindsight_forge::llm::{
    ChatCompletionsClient, ClientConfig, GenerationRequest, LlmProvider, Message,
};
use hindsight_forge::LlmError;

fn create_test_config() -> ClientConfig {
    ClientConfig::from_env()
        .expect("CEREBRAS_API_KEY environment variable must be set for integration tests")
}

fn create_test_client() -> CompletionClient {
    let config = create_test_config();
    let provider = ChatCompletionsClient::new(&config).expect("client should build");
    CompletionClient::new(Arc::new(provider), config.model.clone())
}

#[tokio::test]
#[ignore] // Run with: cargo test --test llm_integration -- --ignored
async fn test_simple_generation() {
    let config = create_test_config();
    let provider = ChatCompletionsClient::new(&config).expect("client should build");

    let request = GenerationRequest::new(
        config.model.clone(),
        vec![
            Message::system("You are a helpful assistant. Reply concisely."),
            Message::user("What is 2 + 2? Reply with just the number."),
        ],
    )
    .with_max_tokens(10)
    .with_temperature(0.0);

    let response = provider.generate(request).await;
    assert!(response.is_ok(), "Generation failed: {:?}", response.err());

    let response = response.expect("Should have response");
    let content = response.first_content().expect("Should have content");
    assert!(content.contains('4'), "Response should contain '4', got: {}", content);
}

#[tokio::test]
#[ignore]
async fn test_json_mode_completion() {
    let client = create_test_client();

    let output = client
        .request_completion(
            "You return small JSON objects.",
            r#"Respond with {"answer": <the number four>}"#,
            &CompletionOptions::json().with_temperature(0.0),
        )
        .await
        .expect("completion should succeed");

    assert!(matches!(output, CompletionOutput::Json(_)));
}

#[tokio::test]
#[ignore]
async fn test_historical_roleplay_generation() {
    let client = create_test_client();
    let scenario = ScenarioRequest::new("transportation", 1800, OutcomePolarity::Positive);

    let value = client
        .generate_historical_roleplay(&scenario)
        .await
        .expect("roleplay generation should succeed");

    let roleplay = roleplay_from_value(&value, ValidationMode::Strict)
        .expect("model should return user and assistant keys");
    assert!(!roleplay.user.is_empty());
    assert!(!roleplay.assistant.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_invalid_api_key() {
    let config = ClientConfig::new("invalid-key");
    let provider = ChatCompletionsClient::new(&config).expect("client should build");

    let request = GenerationRequest::new("", vec![Message::user("test")]).with_max_tokens(5);

    let err = provider
        .generate(request)
        .await
        .expect_err("Should fail with invalid API key");
    assert!(err.is_transport(), "unexpected error kind: {:?}", err);
    assert!(!matches!(err, LlmError::ParseError(_)));
}
