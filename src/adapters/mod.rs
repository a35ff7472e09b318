// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fixture_probe;
pub mod fs_local;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::ProcessExecAdapter;
pub use fixture_probe::FixtureProbeAdapter;
pub use fs_local::FsLocalAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
