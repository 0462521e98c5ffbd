//! Command-line interface for hindsight-forge.
//!
//! Provides the generation sweep plus small utilities for inspecting datasets
//! and stripping reasoning blocks from model output.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli, Commands};
