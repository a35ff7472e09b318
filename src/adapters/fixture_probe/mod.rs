//! Probe adapter that replays a saved ffprobe JSON report

use std::path::PathBuf;

use tracing::debug;

use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::ProbePort;

/// Returns the contents of a previously captured `ffprobe -print_format json`
/// report instead of running ffprobe
pub struct FixtureProbeAdapter {
    report: PathBuf,
}

impl FixtureProbeAdapter {
    pub fn new(report: impl Into<PathBuf>) -> Self {
        Self { report: report.into() }
    }
}

impl ProbePort for FixtureProbeAdapter {
    fn probe(&self, file_path: &str, _vob_hint: bool) -> ReencodeResult<String> {
        debug!(report = %self.report.display(), file = file_path, "Replaying probe report");
        std::fs::read_to_string(&self.report).map_err(|e| ReencodeError::ProbeFailed {
            path: file_path.to_string(),
            message: format!("cannot read probe report {}: {}", self.report.display(), e),
        })
    }
}
