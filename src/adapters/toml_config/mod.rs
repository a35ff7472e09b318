// TOML config adapter - File and environment configuration layers

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::policy::Variant;
use crate::error::{ReencodeError, ReencodeResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};
use crate::utils::path::PathUtils;

/// Prefix for environment overrides, e.g. `REENCODER_FFMPEG_PATH`
pub const ENV_PREFIX: &str = "REENCODER_";
/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "reencoder.toml";

/// Application settings, the `[reencoder]` table of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub ffmpeg_normalize_path: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub default_variant: Variant,
    /// Attach loose `.srt` files found next to the source
    pub discover_subtitles: bool,
    /// Emit progress as JSON lines instead of plain text
    pub progress_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffmpeg_normalize_path: "ffmpeg-normalize".to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
            default_variant: Variant::HevcNvenc,
            discover_subtitles: false,
            progress_json: false,
        }
    }
}

impl AppConfig {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reencoder: Option<AppConfig>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Create new adapter holding the defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            source: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// File the current values were read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Candidate files in lookup order
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = explicit {
            paths.push(path.to_path_buf());
        }
        paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
        if let Some(dir) = PathUtils::new().user_config_dir("reencoder") {
            paths.push(dir.join("config.toml"));
        }
        paths
    }

    /// Replace the settings with the `[reencoder]` table of a TOML document
    pub fn load_str(&mut self, content: &str) -> ReencodeResult<()> {
        let parsed: ConfigFile = toml::from_str(content).map_err(|e| ReencodeError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })?;
        self.config = parsed.reencoder.unwrap_or_default();
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> ReencodeResult<()> {
        let content = std::fs::read_to_string(path).map_err(|e| ReencodeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        self.load_str(&content)?;
        self.source = Some(path.to_path_buf());
        info!(path = %path.display(), "Loaded configuration");
        Ok(())
    }

    /// Load the first existing file. An explicit path that does not exist is
    /// an error; missing default locations are not.
    pub fn load_first(&mut self, explicit: Option<&Path>) -> ReencodeResult<bool> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ReencodeError::Config {
                    message: format!("Config file does not exist: {}", path.display()),
                });
            }
        }

        for path in Self::search_paths(explicit) {
            if path.is_file() {
                self.load_file(&path)?;
                return Ok(true);
            }
        }
        debug!("No configuration file found, using defaults");
        Ok(false)
    }

    /// Apply `REENCODER_*` overrides read through `lookup`. Returns how many
    /// keys were overridden.
    pub fn apply_env<F>(&mut self, lookup: F) -> ReencodeResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        let var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key)).filter(|v| !v.is_empty());

        if let Some(v) = var("FFPROBE_PATH") {
            self.config.ffprobe_path = v;
            applied += 1;
        }
        if let Some(v) = var("FFMPEG_PATH") {
            self.config.ffmpeg_path = v;
            applied += 1;
        }
        if let Some(v) = var("FFMPEG_NORMALIZE_PATH") {
            self.config.ffmpeg_normalize_path = v;
            applied += 1;
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.config.log_level = v.parse().map_err(config_error)?;
            applied += 1;
        }
        if let Some(v) = var("LOG_FORMAT") {
            self.config.log_format = v.parse().map_err(config_error)?;
            applied += 1;
        }
        if let Some(v) = var("VARIANT") {
            self.config.default_variant = v.parse().map_err(|e| config_error(format!("{}", e)))?;
            applied += 1;
        }
        if let Some(v) = var("DISCOVER_SUBTITLES") {
            self.config.discover_subtitles = parse_bool(&v)?;
            applied += 1;
        }
        if let Some(v) = var("PROGRESS_JSON") {
            self.config.progress_json = parse_bool(&v)?;
            applied += 1;
        }

        Ok(applied)
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn config_error(message: String) -> ReencodeError {
    ReencodeError::Config { message }
}

fn parse_bool(value: &str) -> ReencodeResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(config_error(format!("Expected a boolean, found '{}'", other))),
    }
}
