//! Command implementations

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::adapters::{AppConfig, TracingLogAdapter};
use crate::app::{AppContainer, DefaultAppContainer, InspectRequest, WorkerRequest};
use crate::cli::args::{CheckArgs, CommandArgs, InspectArgs, ProgressArgs, RunArgs};
use crate::engine::policy::Variant;
use crate::engine::progress::ProgressSnapshot;
use crate::ports::LogPort;

/// One line of `--progress-json` output
#[derive(Debug, Serialize)]
struct ProgressEvent {
    event: &'static str,
    #[serde(flatten)]
    snapshot: ProgressSnapshot,
    timestamp: DateTime<Utc>,
}

/// Prints progress snapshots as plain percentages or JSON events
struct ProgressPrinter {
    json: bool,
}

impl ProgressPrinter {
    fn print(&self, percent: u8) -> Result<()> {
        let snapshot = ProgressSnapshot { percent };
        let mut out = io::stdout().lock();
        if self.json {
            let event = ProgressEvent {
                event: "progress",
                snapshot,
                timestamp: Utc::now(),
            };
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        } else {
            writeln!(out, "{}", snapshot.percent)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn container(config: &AppConfig, variant: Option<Variant>, probe_json: Option<&Path>) -> (Variant, DefaultAppContainer) {
    let variant = variant.unwrap_or(config.default_variant);
    (variant, DefaultAppContainer::new(config, variant, probe_json))
}

/// Execute the check command
pub fn check(config: &AppConfig, args: CheckArgs) -> Result<()> {
    let (variant, container) = container(config, args.variant, args.probe_json.as_deref());
    info!(variant = %variant, input = %args.input, "Checking file");

    let result = container
        .check_interactor()
        .should_process(&args.input, &args.output, &variant.policy())
        .context("Failed to check input file")?;

    println!("{}", result);
    Ok(())
}

/// Execute the inspect command
pub fn inspect(config: &AppConfig, args: InspectArgs) -> Result<()> {
    let (_, container) = container(config, None, args.probe_json.as_deref());

    let request = InspectRequest::new(args.input.as_str()).with_subtitles(config.discover_subtitles);
    let response = container
        .inspect_interactor()
        .execute(request)
        .with_context(|| format!("Failed to inspect {}", args.input))?;

    if args.json {
        println!("{}", response.to_json().context("Failed to serialize media info to JSON")?);
    } else {
        println!("{}", response.summary);
    }
    Ok(())
}

/// Execute the command command
pub fn command(config: &AppConfig, args: CommandArgs) -> Result<()> {
    let (variant, container) = container(config, args.variant, args.probe_json.as_deref());

    let request = WorkerRequest::new(args.input.as_str(), args.output.as_str());
    let response = container
        .worker_interactor()
        .process(&request)
        .with_context(|| format!("Failed to build {} command for {}", variant, args.input))?;

    if args.json {
        let body = serde_json::json!({
            "variant": variant,
            "result": response.result,
            "exec_command": response.exec_command,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if response.has_command() {
        println!("{}", response.exec_command.join(" "));
    } else {
        println!("{}", response.result);
    }
    Ok(())
}

/// Execute the run command
pub fn run(config: &AppConfig, args: RunArgs) -> Result<()> {
    let (variant, container) = container(config, args.variant, None);
    let printer = ProgressPrinter {
        json: args.progress_json || config.progress_json,
    };

    let request = WorkerRequest::new(args.input.as_str(), args.output.as_str());
    let mut print_error = None;
    let mut on_progress = |percent: u8| {
        if let Err(e) = printer.print(percent) {
            print_error.get_or_insert(e);
        }
    };

    let result = container
        .worker_interactor()
        .run(&request, &mut on_progress)
        .with_context(|| format!("{} run failed for {}", variant, args.input))?;

    if let Some(e) = print_error {
        return Err(e.context("Failed to write progress"));
    }

    println!("{}", result);
    Ok(())
}

/// Execute the progress command
pub fn progress(config: &AppConfig, args: ProgressArgs) -> Result<()> {
    let variant = args.variant.unwrap_or(config.default_variant);
    let log: Arc<dyn LogPort> = Arc::new(TracingLogAdapter::new(variant.as_str()));
    let mut parser = variant.policy().progress.parser(args.length, log);
    let printer = ProgressPrinter {
        json: args.progress_json || config.progress_json,
    };

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read progress input")?;
        printer.print(parser.parse(&line))?;
    }
    Ok(())
}
