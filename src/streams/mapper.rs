//! Stream mapping utilities

use std::collections::HashSet;

use crate::domain::model::MediaFile;
use crate::engine::policy::{VariantPolicy, VideoPolicy};
use crate::error::{ReencodeError, ReencodeResult};
use crate::streams::audio_mapper::AudioMapper;
use crate::streams::subtitle_processor::SubtitleProcessor;
use crate::streams::{ProcessingMode, StreamMapping, SubtitleSource, VideoStreamMapping};

pub const HEVC_ENCODER: &str = "hevc_nvenc";

/// Stream mapper for creating stream mappings
pub struct StreamMapper;

impl StreamMapper {
    /// Map every retained stream of a populated media file under `policy`
    pub fn create_mapping(media: &MediaFile, policy: &VariantPolicy) -> ReencodeResult<StreamMapping> {
        let info = media.require_info()?;

        let video = info
            .video_streams
            .iter()
            .enumerate()
            .map(|(output_index, stream)| VideoStreamMapping {
                input_index: stream.index,
                output_index,
                codec: stream.codec.clone(),
                bitrate: stream.bitrate,
                mode: match policy.video {
                    VideoPolicy::Copy => ProcessingMode::Copy,
                    VideoPolicy::Hevc { .. } => ProcessingMode::Encode(HEVC_ENCODER.to_string()),
                },
            })
            .collect();

        let mapping = StreamMapping {
            video,
            audio: AudioMapper::map_streams(&info.audio_streams, &policy.audio),
            subtitles: SubtitleProcessor::map_streams(&info.subtitle_streams, media.subtitle_files()),
        };

        Self::validate_mapping(&mapping)?;
        Ok(mapping)
    }

    /// Input indices must be unique across the primary input
    pub fn validate_mapping(mapping: &StreamMapping) -> ReencodeResult<()> {
        let mut seen = HashSet::new();
        let inputs = mapping
            .video
            .iter()
            .map(|v| v.input_index)
            .chain(mapping.audio.iter().map(|a| a.input_index))
            .chain(mapping.subtitles.iter().filter_map(|s| match s.source {
                SubtitleSource::Stream(index) => Some(index),
                SubtitleSource::File { .. } => None,
            }));

        for index in inputs {
            if !seen.insert(index) {
                return Err(ReencodeError::malformed(format!(
                    "stream index {} appears more than once",
                    index
                )));
            }
        }
        Ok(())
    }
}
