//! Probe-result normalizer: raw ffprobe JSON to a populated `MediaFile`

use std::sync::Arc;

use crate::domain::model::{
    AudioStream, MediaFile, MediaInfo, MediaStream, SubtitleStream, VideoStream,
};
use crate::domain::rules::{BitrateRules, ChannelLayoutRules};
use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::LogPort;
use crate::probe::validator::ProbeValidator;
use crate::probe::{ProbeFormat, ProbeOutput, ProbeStream};

/// Builds the stream model from probe output and applies the bitrate policy
pub struct Normalizer {
    log: Arc<dyn LogPort>,
}

impl Normalizer {
    /// Create new normalizer
    pub fn new(log: Arc<dyn LogPort>) -> Self {
        Self { log }
    }

    /// Build a populated media file named `name` from raw probe JSON
    pub fn normalize(&self, name: &str, raw_probe_json: &str, vob_hint: bool) -> ReencodeResult<MediaFile> {
        let mut media = MediaFile::new(name);
        self.populate(&mut media, raw_probe_json, vob_hint)?;
        Ok(media)
    }

    /// Populate `media` in place. A file that is already populated is left
    /// alone and `Ok(false)` is returned. On error nothing is written.
    pub fn populate(&self, media: &mut MediaFile, raw_probe_json: &str, vob_hint: bool) -> ReencodeResult<bool> {
        if media.is_populated() {
            self.log
                .debug(&format!("{}: already populated, skipping normalization", media.name()));
            return Ok(false);
        }

        if vob_hint {
            self.log
                .debug(&format!("{}: probed with the widened DVD window", media.name()));
        }

        let output: ProbeOutput = serde_json::from_str(raw_probe_json)
            .map_err(|e| ReencodeError::malformed(format!("{}: {}", media.name(), e)))?;

        let (size, info) = self.build_info(media.name(), output)?;

        media.populate(size, info);
        Ok(true)
    }

    fn build_info(&self, name: &str, output: ProbeOutput) -> ReencodeResult<(u64, MediaInfo)> {
        let (format, streams) = ProbeValidator::require_shape(output)?;
        let size = ProbeValidator::require_size(&format)?;

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        let mut subtitle_streams = Vec::new();

        for (position, stream) in streams.iter().enumerate() {
            let index = ProbeValidator::require_index(stream, position)?;
            match stream.codec_type.as_deref() {
                Some("video") => {
                    if stream.codec() == "mjpeg" {
                        self.log.debug(&format!("{}: dropping cover art stream {}", name, index));
                        continue;
                    }
                    video_streams.push(Self::video_stream(index, stream));
                }
                Some("audio") => audio_streams.push(self.audio_stream(name, index, stream)?),
                Some("subtitle") => subtitle_streams.push(self.subtitle_stream(name, index, stream)?),
                other => {
                    self.log.debug(&format!(
                        "{}: ignoring stream {} of type {}",
                        name,
                        index,
                        other.unwrap_or("unknown")
                    ));
                }
            }
        }

        ProbeValidator::require_streams(name, &video_streams, &audio_streams)?;

        self.backfill_video_bitrates(name, &format, &mut video_streams, &audio_streams);

        for audio in audio_streams.iter_mut() {
            audio.set_bitrate(BitrateRules::clamp_audio(audio.bitrate()));
        }

        for video in video_streams.iter_mut() {
            if !video.has_known_width() {
                self.log.warn(&format!(
                    "{}: unknown width for video stream {}, bitrate left uncapped",
                    name, video.index
                ));
                continue;
            }
            video.set_bitrate(BitrateRules::cap_video(video.bitrate(), video.width));
        }

        let info = MediaInfo {
            length: format.duration.unwrap_or(0.0),
            overall_bitrate: format.bit_rate,
            video_streams,
            audio_streams,
            subtitle_streams,
        };
        Ok((size, info))
    }

    fn video_stream(index: usize, stream: &ProbeStream) -> VideoStream {
        VideoStream::new(
            index,
            stream.codec(),
            stream.bit_rate.unwrap_or(0),
            dimension(stream.width),
            dimension(stream.height),
        )
    }

    fn audio_stream(&self, name: &str, index: usize, stream: &ProbeStream) -> ReencodeResult<AudioStream> {
        let channels = stream.channels.and_then(|c| u32::try_from(c).ok());
        let resolved = ChannelLayoutRules::resolve(channels, stream.channel_layout.as_deref());
        if resolved.fallback {
            self.log.warn(&format!(
                "{}: cannot derive channel count from layout '{}' on stream {}, assuming 2",
                name, resolved.layout, index
            ));
        }

        let bitrate = BitrateRules::initial_audio_bitrate(stream.bit_rate, resolved.channels);
        Ok(AudioStream::new(
            index,
            stream.codec(),
            bitrate,
            resolved.channels,
            resolved.layout,
        )?)
    }

    fn subtitle_stream(&self, name: &str, index: usize, stream: &ProbeStream) -> ReencodeResult<SubtitleStream> {
        match SubtitleStream::new(index, stream.codec(), stream.language_tag()) {
            Ok(subtitle) => Ok(subtitle),
            Err(e) => {
                self.log.warn(&format!("{}: subtitle stream {}: {}, using unk", name, index, e));
                Ok(SubtitleStream::new(index, stream.codec(), None)?)
            }
        }
    }

    /// Give every video stream without a bitrate an equal share of what the
    /// container bitrate leaves after the known streams
    fn backfill_video_bitrates(
        &self,
        name: &str,
        format: &ProbeFormat,
        video_streams: &mut [VideoStream],
        audio_streams: &[AudioStream],
    ) {
        let unknown_count = video_streams.iter().filter(|v| v.bitrate == 0).count();
        if unknown_count == 0 {
            return;
        }

        let Some(overall) = format.bit_rate else {
            self.log.warn(&format!(
                "{}: no overall bitrate reported, {} video stream(s) keep bitrate 0",
                name, unknown_count
            ));
            return;
        };

        let known_video = video_streams.iter().map(|v| v.bitrate).fold(0u64, u64::saturating_add);
        let audio_total = audio_streams.iter().map(|a| a.bitrate).fold(0u64, u64::saturating_add);

        if let Some(share) = BitrateRules::backfill_share(overall, known_video, audio_total, unknown_count) {
            if share == 0 {
                self.log.warn(&format!(
                    "{}: known streams exceed the overall bitrate, backfill is 0",
                    name
                ));
            }
            for video in video_streams.iter_mut().filter(|v| v.bitrate == 0) {
                video.set_bitrate(share);
            }
        }
    }
}

fn dimension(value: Option<u64>) -> u32 {
    value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
}
