//! Hindsight dialogue dataset: data model, sweep planning, JSONL persistence
//! and the generation driver.
//!
//! ```ignore
//! use hindsight_forge::dataset::{DatabaseGenerator, GeneratorConfig, SweepPlan};
//!
//! let generator = DatabaseGenerator::new(client, GeneratorConfig::default());
//! let report = generator.generate(&SweepPlan::default()).await?;
//! println!("{} records written", report.succeeded());
//! ```

pub mod generator;
pub mod plan;
pub mod progress;
pub mod store;
pub mod types;
pub mod validation;

pub use generator::{DatabaseGenerator, GeneratorConfig, ItemFailure, SweepReport, DEFAULT_DELAY};
pub use plan::{default_topic_pairs, SweepPlan, DEFAULT_TOPICS};
pub use progress::{ProgressSnapshot, SweepProgress};
pub use store::JsonlStore;
pub use types::{DialogueRecord, OutcomePolarity, Roleplay, ScenarioRequest, TopicPair};
pub use validation::{roleplay_from_value, ValidationMode};
