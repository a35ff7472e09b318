//! Shape checks on probe output and on the normalized stream set

use crate::domain::model::{AudioStream, VideoStream};
use crate::error::{ReencodeError, ReencodeResult};
use crate::probe::{ProbeFormat, ProbeOutput, ProbeStream};

/// Probe output validator
pub struct ProbeValidator;

impl ProbeValidator {
    /// Split a parsed document into its required parts
    pub fn require_shape(output: ProbeOutput) -> ReencodeResult<(ProbeFormat, Vec<ProbeStream>)> {
        let format = output
            .format
            .ok_or_else(|| ReencodeError::malformed("probe output has no 'format' object"))?;
        let streams = output
            .streams
            .ok_or_else(|| ReencodeError::malformed("probe output has no 'streams' array"))?;
        Ok((format, streams))
    }

    pub fn require_size(format: &ProbeFormat) -> ReencodeResult<u64> {
        format
            .size
            .ok_or_else(|| ReencodeError::malformed("'format.size' is missing"))
    }

    pub fn require_index(stream: &ProbeStream, position: usize) -> ReencodeResult<usize> {
        stream
            .index
            .map(|i| i as usize)
            .ok_or_else(|| ReencodeError::malformed(format!("stream #{} has no 'index'", position)))
    }

    /// A file is only usable with at least one video and one audio stream
    pub fn require_streams(path: &str, video: &[VideoStream], audio: &[AudioStream]) -> ReencodeResult<()> {
        if video.is_empty() || audio.is_empty() {
            return Err(ReencodeError::NoUsableStreams {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_format_is_malformed() {
        let output = ProbeOutput {
            format: None,
            streams: Some(vec![]),
        };
        let err = ProbeValidator::require_shape(output).unwrap_err();
        assert!(matches!(err, ReencodeError::MalformedOutput { .. }));
    }

    #[test]
    fn test_empty_stream_sets_are_unusable() {
        let video = vec![VideoStream::new(0, "h264", 0, 1920, 1080)];
        let err = ProbeValidator::require_streams("a.mkv", &video, &[]).unwrap_err();
        assert!(matches!(err, ReencodeError::NoUsableStreams { .. }));
    }
}
