//! LLM prompts for hindsight dialogue generation.

pub mod roleplay;

pub use roleplay::{build_roleplay_prompt, RoleplayPrompt, JSON_MODE_INSTRUCTION};
