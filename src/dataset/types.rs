//! Core types for the hindsight dialogue dataset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether the critique should conclude the pitched idea succeeded or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutcomePolarity {
    /// The idea ultimately proved valid.
    Positive,
    /// The idea was later disproven.
    Negative,
}

impl OutcomePolarity {
    /// Both polarities, positive first.
    pub fn all() -> [OutcomePolarity; 2] {
        [OutcomePolarity::Positive, OutcomePolarity::Negative]
    }

    /// Lowercase label used in ids and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomePolarity::Positive => "positive",
            OutcomePolarity::Negative => "negative",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, OutcomePolarity::Positive)
    }
}

impl fmt::Display for OutcomePolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomePolarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(OutcomePolarity::Positive),
            "negative" => Ok(OutcomePolarity::Negative),
            other => Err(format!(
                "Invalid outcome polarity '{}': must be 'positive' or 'negative'",
                other
            )),
        }
    }
}

impl TryFrom<String> for OutcomePolarity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A (topic, polarity) element of a sweep's topic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPair {
    pub topic: String,
    pub polarity: OutcomePolarity,
}

impl TopicPair {
    pub fn new(topic: impl Into<String>, polarity: OutcomePolarity) -> Self {
        Self {
            topic: topic.into(),
            polarity,
        }
    }
}

/// One scenario to generate: a topic, a year, and the historical outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest {
    pub topic: String,
    pub year: i32,
    pub polarity: OutcomePolarity,
}

impl ScenarioRequest {
    pub fn new(topic: impl Into<String>, year: i32, polarity: OutcomePolarity) -> Self {
        Self {
            topic: topic.into(),
            year,
            polarity,
        }
    }

    /// Deterministic record id for this scenario.
    ///
    /// `variant` is `Some(k)` (1-based) when more than one repeat is generated
    /// per combination, which appends `_variant_<k>`.
    pub fn entry_id(&self, variant: Option<u32>) -> String {
        let mut id = format!(
            "{}_{}_{}",
            self.topic.replace(' ', "_"),
            self.year,
            self.polarity
        );
        if let Some(k) = variant {
            id.push_str(&format!("_variant_{}", k));
        }
        id
    }
}

/// The generated dialogue: an idea pitch and its critique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roleplay {
    /// The curious thinker's pitch.
    pub user: String,
    /// The critical analyst's response.
    pub assistant: String,
}

/// One line of the persisted dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub id: String,
    pub topic: String,
    pub year: i32,
    pub hindsight_outcome: OutcomePolarity,
    pub roleplay: Roleplay,
}

impl DialogueRecord {
    /// Build a record for `scenario`, deriving its id.
    pub fn new(scenario: &ScenarioRequest, variant: Option<u32>, roleplay: Roleplay) -> Self {
        Self {
            id: scenario.entry_id(variant),
            topic: scenario.topic.clone(),
            year: scenario.year,
            hindsight_outcome: scenario.polarity,
            roleplay,
        }
    }
}
