//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::Cli;

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigReport {
    pub config: AppConfig,
    pub file: Option<std::path::PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(cli: &Cli) -> Result<ConfigReport> {
    initialize_with_env(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration`] with an explicit environment lookup
pub fn initialize_with_env<F>(cli: &Cli, lookup: F) -> Result<ConfigReport>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1: defaults come from TomlConfigAdapter::new()
    let mut adapter = TomlConfigAdapter::new();

    // Step 2: first config file found
    adapter
        .load_first(cli.config.as_deref())
        .context("Failed to load configuration file")?;
    let file = adapter.source().map(|p| p.to_path_buf());

    // Step 3: REENCODER_* environment variables
    let env_overrides = adapter
        .apply_env(lookup)
        .context("Invalid environment configuration")?;

    // Step 4: global CLI flags
    let mut cli_overrides = 0;
    let config = adapter.config_mut();
    if let Some(level) = cli.log_level {
        config.log_level = level;
        cli_overrides += 1;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
        cli_overrides += 1;
    }

    Ok(ConfigReport {
        config: adapter.into_config(),
        file,
        env_overrides,
        cli_overrides,
    })
}
