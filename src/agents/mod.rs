//! LLM-backed agents for hindsight-forge.
//!
//! - [`completion_client`] - prompt construction, remote completion and
//!   response normalization for historical roleplay dialogues

pub mod completion_client;

pub use completion_client::{
    CompletionClient, CompletionOptions, CompletionOutput, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
    MAX_OUTPUT_TOKENS,
};
