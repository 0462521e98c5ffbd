//! Sweep plans: which topics, years and repeats a generation run covers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::types::{OutcomePolarity, TopicPair};
use crate::error::ConfigError;

/// Topics of the default sweep. Each is paired with both polarities.
pub const DEFAULT_TOPICS: [&str; 16] = [
    "transportation",
    "communication",
    "energy",
    "agriculture",
    "medicine",
    "science",
    "technology",
    "economics",
    "politics",
    "warfare",
    "physics",
    "biology",
    "chemistry",
    "geology",
    "astronomy",
    "geography",
];

pub const DEFAULT_START_YEAR: i32 = 1700;
pub const DEFAULT_END_YEAR: i32 = 2015;
pub const DEFAULT_YEAR_STEP: u32 = 10;
pub const DEFAULT_REPEATS: u32 = 1;
pub const DEFAULT_OUTPUT: &str = "noman.jsonl";

/// The cross product a sweep iterates: topics × years × repeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepPlan {
    /// (topic, polarity) pairs in iteration order.
    pub topics: Vec<TopicPair>,
    /// First year, inclusive.
    pub start_year: i32,
    /// Last year, inclusive when reached by the step.
    pub end_year: i32,
    /// Distance between consecutive years.
    pub year_step: u32,
    /// Generations per (topic, year) combination.
    pub repeats_per_combination: u32,
    /// JSONL output file. Truncated when the sweep starts.
    pub output: PathBuf,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            topics: default_topic_pairs(),
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            year_step: DEFAULT_YEAR_STEP,
            repeats_per_combination: DEFAULT_REPEATS,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Every default topic with positive then negative polarity.
pub fn default_topic_pairs() -> Vec<TopicPair> {
    DEFAULT_TOPICS
        .iter()
        .flat_map(|topic| {
            OutcomePolarity::all()
                .into_iter()
                .map(move |polarity| TopicPair::new(*topic, polarity))
        })
        .collect()
}

impl SweepPlan {
    /// A plan over `topics` with a single year and default step/repeats.
    pub fn new(topics: Vec<TopicPair>, start_year: i32, end_year: i32) -> Self {
        Self {
            topics,
            start_year,
            end_year,
            ..Self::default()
        }
    }

    /// Load a plan from a YAML file. Omitted fields take default values.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let plan: SweepPlan = serde_yaml::from_str(&content)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn with_year_step(mut self, step: u32) -> Self {
        self.year_step = step;
        self
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats_per_combination = repeats;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Years visited, from `start_year` up to `end_year` inclusive.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        let step = self.year_step.max(1) as usize;
        (self.start_year..=self.end_year).step_by(step)
    }

    /// Number of years visited per topic.
    pub fn year_count(&self) -> u64 {
        if self.end_year < self.start_year || self.year_step == 0 {
            return 0;
        }
        let span = (i64::from(self.end_year) - i64::from(self.start_year)) as u64;
        span / u64::from(self.year_step) + 1
    }

    /// Items the sweep will attempt. Used for progress reporting only.
    pub fn expected_total(&self) -> u64 {
        self.topics.len() as u64 * self.year_count() * u64::from(self.repeats_per_combination)
    }

    /// Variant index to put in record ids, if any.
    pub fn variant_for(&self, repeat_index: u32) -> Option<u32> {
        (self.repeats_per_combination > 1).then_some(repeat_index)
    }

    /// Validates the plan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topics.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "topics cannot be empty".to_string(),
            ));
        }

        if let Some(pair) = self.topics.iter().find(|p| p.topic.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed(format!(
                "topic names cannot be empty (polarity {})",
                pair.polarity
            )));
        }

        if self.year_step == 0 {
            return Err(ConfigError::ValidationFailed(
                "year_step must be greater than 0".to_string(),
            ));
        }

        if self.repeats_per_combination == 0 {
            return Err(ConfigError::ValidationFailed(
                "repeats_per_combination must be greater than 0".to_string(),
            ));
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "output path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
