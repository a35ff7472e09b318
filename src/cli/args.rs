//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::engine::policy::Variant;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Source media file
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: String,

    /// Destination file
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub output: String,

    /// Plugin variant (default from config)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Read probe output from a saved ffprobe JSON report
    #[arg(long, value_name = "FILE")]
    pub probe_json: Option<PathBuf>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Source media file
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: String,

    /// Read probe output from a saved ffprobe JSON report
    #[arg(long, value_name = "FILE")]
    pub probe_json: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the command command
#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Source media file
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: String,

    /// Destination file
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub output: String,

    /// Plugin variant (default from config)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Read probe output from a saved ffprobe JSON report
    #[arg(long, value_name = "FILE")]
    pub probe_json: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source media file
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: String,

    /// Destination file
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub output: String,

    /// Plugin variant (default from config)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Print progress as JSON events
    #[arg(long)]
    pub progress_json: bool,
}

/// Arguments for the progress command
#[derive(Args, Debug)]
pub struct ProgressArgs {
    /// Plugin variant whose parser reads the input (default from config)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Source length in seconds, for the elapsed-time parser
    #[arg(long, default_value_t = 0.0)]
    pub length: f64,

    /// Print progress as JSON events
    #[arg(long)]
    pub progress_json: bool,
}
