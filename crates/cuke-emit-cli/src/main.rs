//! # cuke-emit-cli
//!
//! Binary entry point for cuke-emit.
//!
//! This crate provides:
//! - CLI argument parsing using `clap`
//! - Layered override resolution (`--set` flags, config file, environment)
//! - One lifecycle event per invocation, written as an NDJSON line
//! - Shell completions via `cuke-emit completions`

mod completions;
mod events;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuke_emit_core::{ConfigError, EmitConfig, parse_override_assignment};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::completions::CompletionsArgs;
use crate::events::EventCommand;

/// Emit Cucumber-style test lifecycle events as NDJSON.
#[derive(Parser, Debug)]
#[command(name = "cuke-emit", version, about)]
pub struct Cli {
    /// YAML config file with `output` and `overrides`
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append envelopes to this file instead of writing to stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Set an override, e.g. SpecFlow_Messages_TestRunStartedTimeOverride=2020-01-01T00:00:00Z
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_set)]
    overrides: Vec<(String, String)>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Event(EventCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

fn parse_set(assignment: &str) -> Result<(String, String), ConfigError> {
    parse_override_assignment(assignment)
}

/// Logs go to stderr; stdout carries the NDJSON stream.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = match cli.command {
        Commands::Completions(args) => {
            completions::write_completions(&args, &mut std::io::stdout());
            return Ok(());
        }
        Commands::Event(command) => command,
    };

    let config = match &cli.config {
        Some(path) => EmitConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EmitConfig::default(),
    };

    let output = cli.output.or_else(|| config.output.clone());
    debug!(
        output = ?output,
        flag_overrides = cli.overrides.len(),
        file_overrides = config.overrides.len(),
        "Resolved emitter settings"
    );

    let overrides = events::layered_overrides(&cli.overrides, &config);
    let sender = events::build_sender(output.as_deref(), overrides)?;
    events::execute(&command, &sender)
}
