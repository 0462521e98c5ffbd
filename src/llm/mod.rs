//! LLM integration for hindsight-forge.
//!
//! This module provides the provider abstraction, an HTTP client for
//! OpenAI-compatible chat-completion endpoints, and helpers for normalizing
//! model output.
//!
//! ```ignore
//! use hindsight_forge::llm::{ChatCompletionsClient, ClientConfig, GenerationRequest, LlmProvider, Message};
//!
//! let config = ClientConfig::from_env()?;
//! let client = ChatCompletionsClient::new(&config)?;
//! let request = GenerationRequest::new("", vec![Message::user("Hello!")]);
//! let response = client.generate(request).await?;
//! ```

pub mod completions;
pub mod config;
pub mod thinking;

pub use completions::{
    ChatCompletionsClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message,
    ResponseFormat, Usage,
};
pub use config::ClientConfig;
pub use thinking::{extract_thinking, ThinkingExtraction};
