//! Completion client for historical roleplay generation.
//!
//! Turns a [`ScenarioRequest`] into a system/user prompt pair, sends it to an
//! [`LlmProvider`], and normalizes the reply into text or parsed JSON.

use std::sync::Arc;

use serde_json::Value;

use crate::dataset::ScenarioRequest;
use crate::error::LlmError;
use crate::llm::{
    extract_thinking, GenerationRequest, LlmProvider, Message, ResponseFormat, ThinkingExtraction,
};
use crate::prompts::{build_roleplay_prompt, JSON_MODE_INSTRUCTION};

/// Output token cap sent with every request.
pub const MAX_OUTPUT_TOKENS: u32 = 8048;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default nucleus sampling parameter.
pub const DEFAULT_TOP_P: f64 = 0.95;

/// Sampling and output-mode options for one completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f64,
    pub top_p: f64,
    /// Request a JSON object and parse the reply.
    pub json_mode: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            json_mode: false,
        }
    }
}

impl CompletionOptions {
    /// Default sampling with JSON mode enabled.
    pub fn json() -> Self {
        Self {
            json_mode: true,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }
}

/// A normalized completion: raw text, or the parsed JSON value in JSON mode.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutput {
    Text(String),
    Json(Value),
}

impl CompletionOutput {
    /// Consume as JSON, failing on text output.
    pub fn into_json(self) -> Result<Value, LlmError> {
        match self {
            CompletionOutput::Json(value) => Ok(value),
            CompletionOutput::Text(_) => Err(LlmError::ParseError(
                "Expected JSON output but completion was requested in text mode".to_string(),
            )),
        }
    }
}

/// Client that asks a model for period-situated idea/critique dialogues.
pub struct CompletionClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl CompletionClient {
    /// Create a client sending every request to `model` through `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// The fixed model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system/user prompt pair and normalize the reply.
    ///
    /// In JSON mode the system prompt gains an explicit JSON instruction, the
    /// request is constrained to a JSON object, and the reply is parsed.
    ///
    /// # Errors
    ///
    /// Provider failures are returned as-is. An empty choice list or, in JSON
    /// mode, a reply that is not valid JSON yields `LlmError::ParseError`.
    pub async fn request_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<CompletionOutput, LlmError> {
        let system = if options.json_mode {
            format!("{}{}", system_prompt, JSON_MODE_INSTRUCTION)
        } else {
            system_prompt.to_string()
        };

        let mut request = GenerationRequest::new(
            self.model.clone(),
            vec![Message::system(system), Message::user(user_prompt)],
        )
        .with_temperature(options.temperature)
        .with_top_p(options.top_p)
        .with_max_tokens(MAX_OUTPUT_TOKENS);

        if options.json_mode {
            request = request.with_response_format(ResponseFormat::json_object());
        }

        let response = self.provider.generate(request).await?;
        tracing::debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Completion received"
        );

        let content = response
            .first_content()
            .ok_or_else(|| LlmError::ParseError("No content in LLM response".to_string()))?;

        if options.json_mode {
            let value = serde_json::from_str(content).map_err(|e| {
                LlmError::ParseError(format!("Model reply is not valid JSON: {}", e))
            })?;
            Ok(CompletionOutput::Json(value))
        } else {
            Ok(CompletionOutput::Text(content.to_string()))
        }
    }

    /// Separate `<think>` reasoning blocks from answer text.
    ///
    /// Not applied by the dataset sweep, which runs in JSON mode.
    pub fn extract_thinking(&self, text: &str) -> ThinkingExtraction {
        extract_thinking(text)
    }

    /// Ask for a dialogue about `scenario` and return the parsed JSON reply.
    ///
    /// The reply is expected to carry `user` and `assistant` keys but is not
    /// checked here.
    pub async fn generate_historical_roleplay(
        &self,
        scenario: &ScenarioRequest,
    ) -> Result<Value, LlmError> {
        let prompt = build_roleplay_prompt(scenario);
        self.request_completion(&prompt.system, &prompt.user, &CompletionOptions::json())
            .await?
            .into_json()
    }

    /// Roleplay wrapped as `{"content": <roleplay>}`.
    pub async fn generate_full_example(&self, scenario: &ScenarioRequest) -> Result<Value, LlmError> {
        let roleplay = self.generate_historical_roleplay(scenario).await?;
        Ok(serde_json::json!({ "content": roleplay }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::OutcomePolarity;
    use crate::llm::{Choice, GenerationResponse, Usage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock provider that returns a fixed reply and records requests.
    struct MockLlmProvider {
        response: String,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockLlmProvider {
        fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> GenerationRequest {
            self.requests
                .lock()
                .expect("lock not poisoned")
                .last()
                .cloned()
                .expect("a request was sent")
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.requests
                .lock()
                .expect("lock not poisoned")
                .push(request);
            Ok(GenerationResponse {
                id: "mock-id".to_string(),
                model: "mock-model".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(self.response.clone()),
                    finish_reason: "stop".to_string(),
                }],
                usage: Usage::default(),
            })
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl LlmProvider for EmptyProvider {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            Ok(GenerationResponse {
                id: String::new(),
                model: String::new(),
                choices: vec![],
                usage: Usage::default(),
            })
        }
    }

    #[test]
    fn test_default_options() {
        let options = CompletionOptions::default();
        assert!((options.temperature - 0.7).abs() < f64::EPSILON);
        assert!((options.top_p - 0.95).abs() < f64::EPSILON);
        assert!(!options.json_mode);
        assert!(CompletionOptions::json().json_mode);
    }

    #[tokio::test]
    async fn test_text_mode_returns_raw_text() {
        let provider = Arc::new(MockLlmProvider::new("  <think>hmm</think> Raw answer  "));
        let client = CompletionClient::new(provider.clone(), "llama3.1-8b");

        let output = client
            .request_completion("sys", "usr", &CompletionOptions::default())
            .await
            .expect("should complete");

        assert_eq!(
            output,
            CompletionOutput::Text("  <think>hmm</think> Raw answer  ".to_string())
        );

        let request = provider.last_request();
        assert_eq!(request.model, "llama3.1-8b");
        assert_eq!(request.messages[0], Message::system("sys"));
        assert_eq!(request.messages[1], Message::user("usr"));
        assert_eq!(request.max_tokens, Some(MAX_OUTPUT_TOKENS));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_p, Some(0.95));
        assert!(request.response_format.is_none());
    }

    #[tokio::test]
    async fn test_json_mode_augments_prompt_and_parses() {
        let provider = Arc::new(MockLlmProvider::new(r#"{"user": "u", "assistant": "a"}"#));
        let client = CompletionClient::new(provider.clone(), "llama3.1-8b");

        let options = CompletionOptions::json().with_temperature(0.2).with_top_p(0.5);
        let output = client
            .request_completion("sys", "usr", &options)
            .await
            .expect("should complete");

        assert_eq!(
            output,
            CompletionOutput::Json(serde_json::json!({"user": "u", "assistant": "a"}))
        );

        let request = provider.last_request();
        assert_eq!(
            request.messages[0].content,
            format!("sys{}", JSON_MODE_INSTRUCTION)
        );
        assert_eq!(request.response_format, Some(ResponseFormat::json_object()));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.top_p, Some(0.5));
    }

    #[tokio::test]
    async fn test_json_mode_parse_error_propagates() {
        let provider = Arc::new(MockLlmProvider::new("Sure! Here is a dialogue."));
        let client = CompletionClient::new(provider, "m");

        let result = client
            .request_completion("sys", "usr", &CompletionOptions::json())
            .await;

        assert!(matches!(result, Err(LlmError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_empty_choices_is_parse_error() {
        let client = CompletionClient::new(Arc::new(EmptyProvider), "m");
        let result = client
            .request_completion("sys", "usr", &CompletionOptions::default())
            .await;
        assert!(matches!(result, Err(LlmError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_generate_historical_roleplay() {
        let provider = Arc::new(MockLlmProvider::new(
            r#"{"user": "A railway across the continent?", "assistant": "Iron is costly."}"#,
        ));
        let client = CompletionClient::new(provider.clone(), "m");
        let scenario = ScenarioRequest::new("transportation", 1830, OutcomePolarity::Positive);

        let value = client
            .generate_historical_roleplay(&scenario)
            .await
            .expect("should generate");

        assert_eq!(value["user"], "A railway across the continent?");
        assert_eq!(value["assistant"], "Iron is costly.");

        let request = provider.last_request();
        assert!(request.messages[0].content.contains("in 1830 discussing transportation"));
        assert!(request.messages[0].content.ends_with(JSON_MODE_INSTRUCTION));
        assert!(request.response_format.is_some());
    }

    #[tokio::test]
    async fn test_generate_historical_roleplay_does_not_check_keys() {
        let provider = Arc::new(MockLlmProvider::new(r#"{"pitch": "x"}"#));
        let client = CompletionClient::new(provider, "m");
        let scenario = ScenarioRequest::new("energy", 1900, OutcomePolarity::Negative);

        let value = client
            .generate_historical_roleplay(&scenario)
            .await
            .expect("missing keys are not an error here");
        assert!(value.get("user").is_none());
    }

    #[tokio::test]
    async fn test_generate_full_example_wraps_content() {
        let provider = Arc::new(MockLlmProvider::new(r#"{"user": "u", "assistant": "a"}"#));
        let client = CompletionClient::new(provider, "m");
        let scenario = ScenarioRequest::new("physics", 1905, OutcomePolarity::Positive);

        let value = client
            .generate_full_example(&scenario)
            .await
            .expect("should generate");
        assert_eq!(value["content"]["assistant"], "a");
    }

    #[test]
    fn test_extract_thinking_delegates() {
        let client = CompletionClient::new(Arc::new(EmptyProvider), "m");
        let result = client.extract_thinking("<think>plan</think> answer ");
        assert_eq!(result.thinking, vec!["plan".to_string()]);
        assert_eq!(result.content, "answer");
    }

    #[test]
    fn test_output_conversions() {
        let json = CompletionOutput::Json(serde_json::json!({"a": 1}));
        assert_eq!(json.into_json().expect("json output"), serde_json::json!({"a": 1}));
        assert!(CompletionOutput::Text("x".to_string()).into_json().is_err());
    }
}
