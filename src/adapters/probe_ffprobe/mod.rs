//! ffprobe adapter for media file probing

use std::process::Command;

use tracing::debug;

use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::ProbePort;
use crate::probe::probe_args;

/// Runs ffprobe and returns its JSON report
pub struct FfprobeAdapter {
    program: String,
}

impl FfprobeAdapter {
    /// Create new ffprobe adapter
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ProbePort for FfprobeAdapter {
    fn probe(&self, file_path: &str, vob_hint: bool) -> ReencodeResult<String> {
        let args = probe_args(&self.program, file_path, vob_hint);
        debug!(command = %args.join(" "), "Probing");

        let output = Command::new(&args[0])
            .args(&args[1..])
            .output()
            .map_err(|e| ReencodeError::ProbeFailed {
                path: file_path.to_string(),
                message: format!("cannot run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReencodeError::ProbeFailed {
                path: file_path.to_string(),
                message: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ReencodeError::malformed(format!("probe output is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_probe_failure() {
        let adapter = FfprobeAdapter::new("/nonexistent/ffprobe-for-tests");
        let err = adapter.probe("movie.mkv", false).unwrap_err();
        assert!(matches!(err, ReencodeError::ProbeFailed { .. }));
        assert!(err.is_recoverable());
    }
}
