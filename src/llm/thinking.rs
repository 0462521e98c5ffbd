//! Reasoning-block extraction for free-text model output.
//!
//! Some models emit intermediate reasoning wrapped in `<think>...</think>`
//! before the final answer. [`extract_thinking`] separates the two.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Opening delimiter of a reasoning block.
pub const THINK_OPEN: &str = "<think>";

/// Closing delimiter of a reasoning block.
pub const THINK_CLOSE: &str = "</think>";

/// Reasoning spans and remaining answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingExtraction {
    /// Inner text of each reasoning block, in order of appearance.
    pub thinking: Vec<String>,
    /// Input with every reasoning block removed, trimmed.
    pub content: String,
}

fn think_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // (?s) lets `.` span newlines; `*?` keeps adjacent blocks separate.
    PATTERN.get_or_init(|| {
        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(THINK_OPEN),
            regex::escape(THINK_CLOSE)
        );
        Regex::new(&pattern).expect("valid regex")
    })
}

/// Split `text` into reasoning blocks and answer content.
///
/// Blocks are non-overlapping and matched left to right. An unterminated
/// `<think>` is left in the content untouched.
pub fn extract_thinking(text: &str) -> ThinkingExtraction {
    let pattern = think_pattern();

    let thinking: Vec<String> = pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let content = if thinking.is_empty() {
        text.trim().to_string()
    } else {
        pattern.replace_all(text, "").trim().to_string()
    };

    ThinkingExtraction { thinking, content }
}
