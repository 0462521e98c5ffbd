//! Conversion of a model's JSON reply into a [`Roleplay`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::types::Roleplay;
use crate::error::GeneratorError;

/// How strictly the `user`/`assistant` keys of a reply are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Missing or non-string keys become empty strings.
    #[default]
    Lenient,
    /// Both keys must be present strings, otherwise the item fails.
    Strict,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Lenient => f.write_str("lenient"),
            ValidationMode::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ValidationMode::Lenient),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(format!(
                "Invalid validation mode '{}': must be 'lenient' or 'strict'",
                other
            )),
        }
    }
}

/// Convert a parsed reply into a [`Roleplay`] under `mode`.
pub fn roleplay_from_value(value: &Value, mode: ValidationMode) -> Result<Roleplay, GeneratorError> {
    let field = |key: &str| -> Result<String, GeneratorError> {
        match (value.get(key), mode) {
            (Some(Value::String(s)), _) => Ok(s.clone()),
            (Some(other), ValidationMode::Lenient) => {
                warn!(
                    key = key,
                    found = json_type_name(other),
                    "Discarding non-string '{}' in roleplay reply",
                    key
                );
                Ok(String::new())
            }
            (None, ValidationMode::Lenient) => Ok(String::new()),
            (None, ValidationMode::Strict) => Err(GeneratorError::InvalidRoleplay(format!(
                "missing '{}' key",
                key
            ))),
            (Some(other), ValidationMode::Strict) => Err(GeneratorError::InvalidRoleplay(
                format!("'{}' must be a string, got {}", key, json_type_name(other)),
            )),
        }
    };

    if mode == ValidationMode::Strict && !value.is_object() {
        return Err(GeneratorError::InvalidRoleplay(format!(
            "expected a JSON object, got {}",
            json_type_name(value)
        )));
    }

    Ok(Roleplay {
        user: field("user")?,
        assistant: field("assistant")?,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
