//! reencoder CLI
//!
//! Re-encode planner for ffmpeg and ffmpeg-normalize plugin variants.
//!
//! # Usage
//!
//! ```bash
//! reencoder check --in "movie.mkv" --out "movie.hevc.mkv" --variant hevc-nvenc
//! reencoder inspect --in "movie.mkv" --json
//! reencoder command --in "movie.mkv" --out "movie.opus.mkv" --variant opus
//! reencoder run --in "movie.mkv" --out "movie.hevc.mkv" --progress-json
//! ffmpeg ... 2>&1 | reencoder progress --variant hevc-nvenc --length 5400
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use reencoder::cli::{commands, Cli, Commands};
use reencoder::config_initialization::initialize_configuration;
use reencoder::utils::logging::init_logging;

/// Main entry point for the reencoder CLI application
fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let report = initialize_configuration(&cli)?;
    let config = report.config;

    init_logging(&config.logging()).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    debug!(
        file = ?report.file,
        env_overrides = report.env_overrides,
        cli_overrides = report.cli_overrides,
        "Configuration initialized"
    );

    // Execute the requested command
    match cli.command {
        Commands::Check(args) => commands::check(&config, args)?,
        Commands::Inspect(args) => commands::inspect(&config, args)?,
        Commands::Command(args) => commands::command(&config, args)?,
        Commands::Run(args) => {
            info!("Executing run command");
            commands::run(&config, args)?;
        }
        Commands::Progress(args) => commands::progress(&config, args)?,
    }

    Ok(())
}
