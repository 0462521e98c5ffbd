//! hindsight-forge: synthetic dataset generator for historical critical thinking.
//!
//! Asks a chat-completion model for dialogues in which a curious thinker
//! pitches an idea in a given year and a critical analyst critiques it with
//! the knowledge of that time, then writes the results to a JSONL file.

pub mod agents;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod prompts;

// Re-export commonly used error types
pub use error::{ConfigError, GeneratorError, LlmError};
