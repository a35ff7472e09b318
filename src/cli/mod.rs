//! CLI module for reencoder
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// reencoder - probe, gate and re-encode media files with ffmpeg
///
/// Each subcommand runs one phase of a transcode plugin variant: the
/// acceptance check, the probe summary, command synthesis, or the full run.
#[derive(Parser, Debug)]
#[command(name = "reencoder")]
#[command(about = "Media re-encoding planner for ffmpeg and ffmpeg-normalize")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overrides config and REENCODER_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format: pretty, compact or json
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Config file to load instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide whether a file would be re-encoded
    Check(args::CheckArgs),
    /// Probe a file and print its normalized stream model
    Inspect(args::InspectArgs),
    /// Print the command a variant would run for a file
    Command(args::CommandArgs),
    /// Build and run the command, reporting progress
    Run(args::RunArgs),
    /// Feed tool output from stdin through a progress parser
    Progress(args::ProgressArgs),
}
