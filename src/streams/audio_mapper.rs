//! Audio stream mapping and encoder selection

use crate::domain::model::AudioStream;
use crate::domain::rules::ChannelLayoutRules;
use crate::engine::policy::AudioPolicy;
use crate::streams::{AudioStreamMapping, ProcessingMode};

pub const OPUS_ENCODER: &str = "libopus";

/// Audio stream mapper
pub struct AudioMapper;

impl AudioMapper {
    /// Encode-or-copy decision for one audio stream
    pub fn select_mode(stream: &AudioStream, policy: &AudioPolicy) -> ProcessingMode {
        match policy {
            AudioPolicy::Copy => ProcessingMode::Copy,
            AudioPolicy::Opus { only: Some(codecs) } if codecs.iter().any(|c| *c == stream.codec) => {
                ProcessingMode::Encode(OPUS_ENCODER.to_string())
            }
            AudioPolicy::Opus { only: Some(_) } => ProcessingMode::Copy,
            AudioPolicy::Opus { only: None } if stream.codec == "opus" => ProcessingMode::Copy,
            AudioPolicy::Opus { only: None } => ProcessingMode::Encode(OPUS_ENCODER.to_string()),
        }
    }

    pub fn map_streams(streams: &[AudioStream], policy: &AudioPolicy) -> Vec<AudioStreamMapping> {
        streams
            .iter()
            .enumerate()
            .map(|(output_index, stream)| AudioStreamMapping {
                input_index: stream.index,
                output_index,
                bitrate: stream.bitrate,
                channel_layout: ChannelLayoutRules::sanitize(&stream.channel_layout).to_string(),
                mode: Self::select_mode(stream, policy),
            })
            .collect()
    }
}
