// Ports - Interface definitions (contracts)

use crate::engine::progress::ProgressParser;
use crate::error::ReencodeResult;

/// Port for probing media files with an external tool
pub trait ProbePort: Send + Sync {
    /// Run the probe and return its raw JSON output
    fn probe(&self, file_path: &str, vob_hint: bool) -> ReencodeResult<String>;
}

/// Port for running the synthesized transcode command
pub trait ExecutePort: Send + Sync {
    /// Run `args` (program first) to completion, feeding every output line to
    /// `parser` and reporting each changed percentage through `on_progress`
    fn execute(
        &self,
        args: &[String],
        parser: &mut dyn ProgressParser,
        on_progress: &mut dyn FnMut(u8),
    ) -> ReencodeResult<()>;
}

/// Port for the few filesystem queries the pipeline needs
pub trait FsPort: Send + Sync {
    fn file_exists(&self, file_path: &str) -> bool;

    fn file_size(&self, file_path: &str) -> ReencodeResult<u64>;

    /// Regular files under `dir_path`, at most `max_depth` levels down, sorted
    fn list_files(&self, dir_path: &str, max_depth: usize) -> ReencodeResult<Vec<String>>;

    fn read_bytes(&self, file_path: &str) -> ReencodeResult<Vec<u8>>;
}

/// Port for logging, injected into the core components
pub trait LogPort: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    fn debug(&self, message: &str);
}
