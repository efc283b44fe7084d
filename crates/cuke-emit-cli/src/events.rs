//! The event subcommands and the sender they drive.
//!
//! Subcommands:
//! - `run-started`: the test run began
//! - `case-started`: a pickle began executing
//! - `case-finished`: a pickle finished, with its status

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use cuke_emit_core::{
    EmitConfig, EnvOverrides, Envelope, EventSender, JsonMessageFactory, LayeredOverrides,
    MapOverrides, NdjsonSink, SystemClock,
};
use cuke_emit_proto::{MessageSink, PickleId, TestOutcome, TestStatus};

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Emit testRunStarted
    RunStarted,

    /// Emit testCaseStarted for a pickle
    CaseStarted(CaseStartedArgs),

    /// Emit testCaseFinished for a pickle
    CaseFinished(CaseFinishedArgs),
}

#[derive(Args, Debug)]
pub struct CaseStartedArgs {
    /// Pickle id (uuid)
    #[arg(long)]
    pub pickle_id: PickleId,
}

#[derive(Args, Debug)]
pub struct CaseFinishedArgs {
    /// Pickle id (uuid)
    #[arg(long)]
    pub pickle_id: PickleId,

    /// Final status of the test case
    #[arg(long, value_enum, default_value_t = StatusArg::Passed)]
    pub status: StatusArg,

    /// Failure or diagnostic message
    #[arg(long)]
    pub message: Option<String>,

    /// How long the test case ran, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub duration_ms: u64,
}

impl CaseFinishedArgs {
    fn outcome(&self) -> TestOutcome {
        let outcome = TestOutcome::new(self.status.into())
            .with_duration(Duration::from_millis(self.duration_ms));
        match &self.message {
            Some(message) => outcome.with_message(message.clone()),
            None => outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Unknown,
    Passed,
    Skipped,
    Pending,
    Undefined,
    Ambiguous,
    Failed,
}

impl From<StatusArg> for TestStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Unknown => TestStatus::Unknown,
            StatusArg::Passed => TestStatus::Passed,
            StatusArg::Skipped => TestStatus::Skipped,
            StatusArg::Pending => TestStatus::Pending,
            StatusArg::Undefined => TestStatus::Undefined,
            StatusArg::Ambiguous => TestStatus::Ambiguous,
            StatusArg::Failed => TestStatus::Failed,
        }
    }
}

/// Stacks override sources: `--set` flags, then the config file, then the
/// process environment.
pub fn layered_overrides(assignments: &[(String, String)], config: &EmitConfig) -> LayeredOverrides {
    let flags: MapOverrides = assignments
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    LayeredOverrides::new()
        .with_layer(Arc::new(flags))
        .with_layer(Arc::new(config.override_provider()))
        .with_layer(Arc::new(EnvOverrides))
}

/// Builds a sender that appends to `output`, or writes to stdout.
pub fn build_sender(
    output: Option<&Path>,
    overrides: LayeredOverrides,
) -> Result<EventSender<JsonMessageFactory>> {
    let sink: Arc<dyn MessageSink<Envelope>> = match output {
        Some(path) => Arc::new(
            NdjsonSink::append_to(path)
                .with_context(|| format!("Failed to open output file {}", path.display()))?,
        ),
        None => Arc::new(NdjsonSink::stdout()),
    };

    Ok(EventSender::new(
        Arc::new(SystemClock),
        Arc::new(JsonMessageFactory),
        sink,
        Arc::new(overrides),
    ))
}

/// Execute an event command.
pub fn execute(command: &EventCommand, sender: &EventSender<JsonMessageFactory>) -> Result<()> {
    match command {
        EventCommand::RunStarted => sender
            .send_run_started()
            .context("Failed to send testRunStarted"),
        EventCommand::CaseStarted(args) => sender
            .send_case_started(args.pickle_id)
            .with_context(|| format!("Failed to send testCaseStarted for {}", args.pickle_id)),
        EventCommand::CaseFinished(args) => sender
            .send_case_finished(args.pickle_id, &args.outcome())
            .with_context(|| format!("Failed to send testCaseFinished for {}", args.pickle_id)),
    }
}
