//! Sweep driver for the hindsight dialogue dataset.
//!
//! Walks the topic × year × repeat cross product of a [`SweepPlan`], asks the
//! [`CompletionClient`] for one dialogue per cell, and appends every success
//! to the JSONL store as soon as it arrives. A failing cell is logged and
//! skipped; the sweep itself only fails if the output file cannot be
//! prepared.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::plan::SweepPlan;
use super::progress::SweepProgress;
use super::store::JsonlStore;
use super::types::{DialogueRecord, ScenarioRequest};
use super::validation::{roleplay_from_value, ValidationMode};
use crate::agents::CompletionClient;
use crate::error::GeneratorError;

/// Default pause after each successful item.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Settings for [`DatabaseGenerator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Pause after each successful item. Zero disables it.
    pub delay: Duration,
    /// How replies missing `user`/`assistant` are treated.
    pub validation: ValidationMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            validation: ValidationMode::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }
}

/// A cell of the sweep that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub topic: String,
    pub year: i32,
    /// 1-based repeat index.
    pub repeat_index: u32,
    pub error: String,
}

/// Outcome of a sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Successfully generated records, in generation (and file) order.
    pub records: Vec<DialogueRecord>,
    /// Cells that were skipped, in the order they failed.
    pub failures: Vec<ItemFailure>,
    /// Items the plan expected to attempt.
    pub expected_total: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Drives a full generation sweep and owns the persistence contract.
pub struct DatabaseGenerator {
    client: CompletionClient,
    config: GeneratorConfig,
}

impl DatabaseGenerator {
    pub fn new(client: CompletionClient, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    /// Run the sweep described by `plan`.
    ///
    /// The output file is truncated before the first request, so anything it
    /// held before is lost. Each successful record is appended immediately;
    /// failed cells leave no line.
    ///
    /// # Errors
    ///
    /// Returns an error only if the plan is invalid or the output file cannot
    /// be created/truncated. Per-item failures are reported in
    /// [`SweepReport::failures`].
    pub async fn generate(&self, plan: &SweepPlan) -> Result<SweepReport, GeneratorError> {
        plan.validate()?;

        let store = JsonlStore::new(&plan.output);
        store.truncate()?;

        let started_at = Utc::now();
        let expected_total = plan.expected_total();
        let mut progress = SweepProgress::new(expected_total);
        let mut records = Vec::new();
        let mut failures = Vec::new();

        info!(
            output = %plan.output.display(),
            topics = plan.topics.len(),
            start_year = plan.start_year,
            end_year = plan.end_year,
            year_step = plan.year_step,
            repeats = plan.repeats_per_combination,
            expected_total = expected_total,
            model = %self.client.model(),
            "Generating historical examples"
        );

        for pair in &plan.topics {
            for year in plan.years() {
                for repeat_index in 1..=plan.repeats_per_combination {
                    let scenario = ScenarioRequest::new(pair.topic.clone(), year, pair.polarity);
                    let variant = plan.variant_for(repeat_index);

                    match self.attempt(&store, &scenario, variant).await {
                        Ok(record) => {
                            progress.record_success(&record.id);
                            records.push(record);
                            if !self.config.delay.is_zero() {
                                tokio::time::sleep(self.config.delay).await;
                            }
                        }
                        Err(err) => {
                            warn!(
                                topic = %scenario.topic,
                                year = year,
                                entry = repeat_index,
                                error = %err,
                                "Error generating roleplay for {} in {} (entry {}): {}",
                                scenario.topic,
                                year,
                                repeat_index,
                                err
                            );
                            progress.record_failure();
                            failures.push(ItemFailure {
                                topic: scenario.topic,
                                year,
                                repeat_index,
                                error: err.to_string(),
                            });
                        }
                    }
                }
            }
        }

        let snap = progress.snapshot();
        info!(
            succeeded = snap.succeeded,
            failed = snap.failed,
            expected = snap.expected,
            elapsed_secs = snap.elapsed.as_secs(),
            "Sweep finished"
        );

        Ok(SweepReport {
            records,
            failures,
            expected_total,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Generate, validate and persist a single cell.
    async fn attempt(
        &self,
        store: &JsonlStore,
        scenario: &ScenarioRequest,
        variant: Option<u32>,
    ) -> Result<DialogueRecord, GeneratorError> {
        let value = self.client.generate_historical_roleplay(scenario).await?;
        let roleplay = roleplay_from_value(&value, self.config.validation)?;
        let record = DialogueRecord::new(scenario, variant, roleplay);
        store.append(&record)?;
        Ok(record)
    }
}
