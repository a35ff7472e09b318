//! Stream handling and mapping module

use serde::Serialize;

pub mod audio_mapper;
pub mod mapper;
pub mod subtitle_processor;

pub use mapper::StreamMapper;

/// What happens to a mapped stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Stream copy (lossless)
    Copy,
    /// Re-encode with the named encoder
    Encode(String),
}

impl ProcessingMode {
    /// Value for the `-c:<kind>:<n>` flag
    pub fn encoder(&self) -> &str {
        match self {
            ProcessingMode::Copy => "copy",
            ProcessingMode::Encode(encoder) => encoder,
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, ProcessingMode::Copy)
    }
}

/// Video stream mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStreamMapping {
    /// Index in the primary input
    pub input_index: usize,
    /// Position among output video streams
    pub output_index: usize,
    pub codec: String,
    pub bitrate: u64,
    pub mode: ProcessingMode,
}

/// Audio stream mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioStreamMapping {
    pub input_index: usize,
    pub output_index: usize,
    pub bitrate: u64,
    /// Layout with annotations stripped, ready for a channelmap filter
    pub channel_layout: String,
    pub mode: ProcessingMode,
}

/// Subtitle stream mapping, internal or from an auxiliary input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleStreamMapping {
    pub source: SubtitleSource,
    pub output_index: usize,
    pub mode: ProcessingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleSource {
    /// Stream index in the primary input
    Stream(usize),
    /// Input file number (1-based, after the primary input)
    File { input: usize, path: String, encoding: String },
}

/// Complete stream plan for one job, in probe order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamMapping {
    pub video: Vec<VideoStreamMapping>,
    pub audio: Vec<AudioStreamMapping>,
    pub subtitles: Vec<SubtitleStreamMapping>,
}

impl StreamMapping {
    /// Auxiliary subtitle inputs, in input order
    pub fn subtitle_files(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.subtitles.iter().filter_map(|s| match &s.source {
            SubtitleSource::File { input, path, encoding } => Some((*input, path.as_str(), encoding.as_str())),
            SubtitleSource::Stream(_) => None,
        })
    }
}
