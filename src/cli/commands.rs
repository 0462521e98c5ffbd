//! CLI command definitions for hindsight-forge.
//!
//! Running the binary with no subcommand executes the default sweep: every
//! default topic paired with both outcome polarities, 1700 to 2015 in steps
//! of ten years, written to `noman.jsonl`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::agents::CompletionClient;
use crate::dataset::{
    DatabaseGenerator, GeneratorConfig, ItemFailure, JsonlStore, OutcomePolarity, SweepPlan,
    SweepReport, TopicPair, ValidationMode,
};
use crate::error::ConfigError;
use crate::llm::config::API_KEY_ENV;
use crate::llm::{extract_thinking, ChatCompletionsClient, ClientConfig};

/// Default pause between successful requests, in milliseconds.
const DEFAULT_DELAY_MS: u64 = 1000;

/// Historical idea-pitch and critique dataset generator.
#[derive(Parser)]
#[command(name = "hindsight-forge")]
#[command(about = "Generate historical idea-pitch and critique dialogues with an LLM")]
#[command(version)]
#[command(
    long_about = "hindsight-forge asks a chat-completion model for period-situated dialogues in which a curious thinker pitches an idea and a critical analyst critiques it with the knowledge of the time.\n\nRecords are appended to a JSONL file as they are generated.\n\nExample usage:\n  hindsight-forge generate --start-year 1800 --end-year 1900 --step 25 --output steam.jsonl"
)]
pub struct Cli {
    /// The subcommand to execute. Defaults to `generate` with default settings.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run a generation sweep and write records to a JSONL file.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Split `<think>` reasoning blocks from model output text.
    StripThinking(StripThinkingArgs),

    /// Summarize an existing JSONL dataset.
    Inspect(InspectArgs),
}

/// Arguments for the generate command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// YAML sweep plan. Flags below override its fields.
    #[arg(short = 'p', long)]
    pub plan: Option<PathBuf>,

    /// Comma-separated topics, each generated with both polarities.
    #[arg(short = 't', long)]
    pub topics: Option<String>,

    /// First year of the sweep.
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year of the sweep (inclusive).
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Years between consecutive scenarios.
    #[arg(long)]
    pub step: Option<u32>,

    /// Dialogues generated per (topic, year) combination.
    #[arg(short = 'r', long)]
    pub repeats: Option<u32>,

    /// Output JSONL file. Existing content is discarded.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Pause after each successful request, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// How replies missing `user`/`assistant` keys are handled (lenient, strict).
    #[arg(long, default_value_t = ValidationMode::Lenient)]
    pub validation: ValidationMode,

    /// Model identifier (overrides HINDSIGHT_MODEL).
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// OpenAI-compatible API base URL (overrides HINDSIGHT_API_BASE).
    #[arg(long)]
    pub api_base: Option<String>,

    /// API key (can also be set via CEREBRAS_API_KEY env var or a .env file).
    #[arg(long, env = "CEREBRAS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output a JSON summary instead of the plain-text one.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for the strip-thinking command.
#[derive(Parser, Debug)]
pub struct StripThinkingArgs {
    /// File to read. Reads stdin when omitted.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
}

/// Arguments for the inspect command.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// JSONL dataset to read.
    #[arg(short = 'i', long, default_value = crate::dataset::plan::DEFAULT_OUTPUT)]
    pub input: PathBuf,

    /// Output JSON instead of text.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Generate(args)) => run_generate_command(args).await,
        Some(Commands::StripThinking(args)) => run_strip_thinking_command(args),
        Some(Commands::Inspect(args)) => run_inspect_command(args),
        None => {
            let args = GenerateArgs::try_parse_from([env!("CARGO_PKG_NAME")])
                .map_err(|e| anyhow::anyhow!("Failed to build default sweep arguments: {}", e))?;
            run_generate_command(args).await
        }
    }
}

// ============================================================================
// Generate
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateOutput {
    status: String,
    output: String,
    topic_pairs: usize,
    expected: u64,
    succeeded: usize,
    failed: usize,
    started_at: String,
    finished_at: String,
    failures: Vec<ItemFailure>,
}

impl GenerateOutput {
    fn from_report(plan: &SweepPlan, report: &SweepReport) -> Self {
        Self {
            status: if report.failed() == 0 {
                "success".to_string()
            } else if report.succeeded() > 0 {
                "partial".to_string()
            } else {
                "failed".to_string()
            },
            output: plan.output.display().to_string(),
            topic_pairs: plan.topics.len(),
            expected: report.expected_total,
            succeeded: report.succeeded(),
            failed: report.failed(),
            started_at: report.started_at.to_rfc3339(),
            finished_at: report.finished_at.to_rfc3339(),
            failures: report.failures.clone(),
        }
    }
}

async fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let plan = build_sweep_plan(&args)?;
    let client_config = build_client_config(&args)?;
    info!(
        api_base = %client_config.api_base,
        model = %client_config.model,
        "Using chat completion endpoint"
    );

    let provider = Arc::new(ChatCompletionsClient::new(&client_config)?);
    let client = CompletionClient::new(provider, client_config.model.clone());
    let generator = DatabaseGenerator::new(
        client,
        GeneratorConfig::default()
            .with_delay(Duration::from_millis(args.delay_ms))
            .with_validation(args.validation),
    );

    let report = generator.generate(&plan).await?;

    if args.json {
        let output = GenerateOutput::from_report(&plan, &report);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Generated {} historical debates across {} topic pairs!",
        report.succeeded(),
        plan.topics.len()
    );
    if report.failed() > 0 {
        println!(
            "{} of {} items failed and were skipped (see log for details).",
            report.failed(),
            report.expected_total
        );
    }
    Ok(())
}

/// Resolve the sweep plan: YAML file or defaults, then flag overrides.
fn build_sweep_plan(args: &GenerateArgs) -> Result<SweepPlan, ConfigError> {
    let mut plan = match &args.plan {
        Some(path) => SweepPlan::from_yaml_file(path)?,
        None => SweepPlan::default(),
    };

    if let Some(topics) = &args.topics {
        plan.topics = parse_topic_list(topics);
    }
    if let Some(start_year) = args.start_year {
        plan.start_year = start_year;
    }
    if let Some(end_year) = args.end_year {
        plan.end_year = end_year;
    }
    if let Some(step) = args.step {
        plan.year_step = step;
    }
    if let Some(repeats) = args.repeats {
        plan.repeats_per_combination = repeats;
    }
    if let Some(output) = &args.output {
        plan.output = output.clone();
    }

    plan.validate()?;
    Ok(plan)
}

/// Expand `a,b` into `a/positive, a/negative, b/positive, b/negative`.
fn parse_topic_list(topics: &str) -> Vec<TopicPair> {
    topics
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .flat_map(|topic| {
            OutcomePolarity::all()
                .into_iter()
                .map(move |polarity| TopicPair::new(topic, polarity))
        })
        .collect()
}

/// Resolve endpoint settings: flags first, then environment.
fn build_client_config(args: &GenerateArgs) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::from_lookup(|key| match key {
        API_KEY_ENV => args.api_key.clone(),
        _ => std::env::var(key).ok(),
    })?;

    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(api_base) = &args.api_base {
        config.api_base = api_base.clone();
    }

    config.validate()?;
    Ok(config)
}

// ============================================================================
// Strip thinking
// ============================================================================

fn run_strip_thinking_command(args: StripThinkingArgs) -> anyhow::Result<()> {
    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let extraction = extract_thinking(&text);
    println!("{}", serde_json::to_string_pretty(&extraction)?);
    Ok(())
}

// ============================================================================
// Inspect
// ============================================================================

#[derive(Debug, Default, Serialize)]
struct InspectOutput {
    path: String,
    records: usize,
    positive: usize,
    negative: usize,
    first_year: Option<i32>,
    last_year: Option<i32>,
    topics: BTreeMap<String, usize>,
}

fn summarize_store(store: &JsonlStore) -> anyhow::Result<InspectOutput> {
    let records = store.read_all()?;

    let mut output = InspectOutput {
        path: store.path().display().to_string(),
        records: records.len(),
        ..InspectOutput::default()
    };

    for record in &records {
        match record.hindsight_outcome {
            OutcomePolarity::Positive => output.positive += 1,
            OutcomePolarity::Negative => output.negative += 1,
        }
        *output.topics.entry(record.topic.clone()).or_insert(0) += 1;
    }
    output.first_year = records.iter().map(|r| r.year).min();
    output.last_year = records.iter().map(|r| r.year).max();

    Ok(output)
}

fn run_inspect_command(args: InspectArgs) -> anyhow::Result<()> {
    let summary = summarize_store(&JsonlStore::new(&args.input))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n=== {} ===", summary.path);
    println!("Records:   {}", summary.records);
    println!("Positive:  {}", summary.positive);
    println!("Negative:  {}", summary.negative);
    if let (Some(first), Some(last)) = (summary.first_year, summary.last_year) {
        println!("Years:     {}-{}", first, last);
    }
    println!();
    for (topic, count) in &summary.topics {
        println!("  {:<20} {}", topic, count);
    }
    Ok(())
}
