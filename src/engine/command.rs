//! Command synthesis: populated media file + variant policy -> argument list

use std::sync::Arc;

use crate::domain::model::TranscodeJob;
use crate::engine::loudness::normalize_args;
use crate::engine::policy::{HwAccel, Tool, VariantPolicy, VideoPolicy};
use crate::error::ReencodeResult;
use crate::ports::LogPort;
use crate::probe::probe_window_args;
use crate::streams::{StreamMapper, StreamMapping, SubtitleSource};

/// Program names for the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: String,
    pub ffmpeg_normalize: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffmpeg_normalize: "ffmpeg-normalize".to_string(),
        }
    }
}

/// Builds the external tool invocation for a job
pub struct CommandSynthesizer {
    tools: ToolPaths,
    log: Arc<dyn LogPort>,
}

impl CommandSynthesizer {
    /// Create new command synthesizer
    pub fn new(tools: ToolPaths, log: Arc<dyn LogPort>) -> Self {
        Self { tools, log }
    }

    /// Ordered argument list, program first. Deterministic for a given job
    /// and policy.
    pub fn build_command(&self, job: &TranscodeJob, policy: &VariantPolicy) -> ReencodeResult<Vec<String>> {
        let args = match policy.tool {
            Tool::FfmpegNormalize { extra_args } => normalize_args(
                &self.tools.ffmpeg_normalize,
                job.source.name(),
                job.destination.name(),
                extra_args,
            ),
            Tool::Ffmpeg => {
                let mapping = StreamMapper::create_mapping(&job.source, policy)?;
                self.ffmpeg_args(job, policy, &mapping)
            }
        };

        self.log.info(&format!("{} command: {}", policy.variant, args.join(" ")));
        Ok(args)
    }

    fn ffmpeg_args(&self, job: &TranscodeJob, policy: &VariantPolicy, mapping: &StreamMapping) -> Vec<String> {
        let mut args = CommandLine::new(&self.tools.ffmpeg);
        args.push_all(&["-hide_banner", "-loglevel", "info", "-vsync", "0"]);
        args.extend(probe_window_args(job.source.is_vob()));

        match policy.hwaccel {
            HwAccel::None => {}
            HwAccel::Cuda => args.push_all(&["-hwaccel", "cuda", "-hwaccel_output_format", "cuda"]),
            HwAccel::Cuvid => {
                for video in &mapping.video {
                    if let Some(decoder) = HwAccel::cuvid_decoder(&video.codec) {
                        args.push_all(&["-hwaccel", "cuvid"]);
                        args.push(format!("-c:v:{}", video.output_index));
                        args.push(decoder);
                    }
                }
            }
        }

        args.push("-i");
        args.push(job.source.name());

        for (_, path, encoding) in mapping.subtitle_files() {
            if !encoding.is_empty() {
                args.push("-sub_charenc");
                args.push(encoding);
            }
            args.push("-i");
            args.push(path);
        }

        for video in &mapping.video {
            args.push("-map");
            args.push(format!("0:{}", video.input_index));
        }
        for audio in &mapping.audio {
            args.push("-map");
            args.push(format!("0:{}", audio.input_index));
        }
        for subtitle in &mapping.subtitles {
            args.push("-map");
            match &subtitle.source {
                SubtitleSource::Stream(index) => args.push(format!("0:{}", index)),
                SubtitleSource::File { input, .. } => args.push(input.to_string()),
            }
        }

        for video in &mapping.video {
            let n = video.output_index;
            args.push(format!("-c:v:{}", n));
            args.push(video.mode.encoder());

            if let (false, VideoPolicy::Hevc { rate_control }) = (video.mode.is_copy(), policy.video) {
                args.push_all(&["-preset", "slow", "-rc", rate_control, "-rc-lookahead", "32"]);
                args.push_all(&["-cq", "28", "-g", "250", "-qmin", "0", "-qmax", "34"]);
                args.push(format!("-b:v:{}", n));
                args.push("0");
                args.push("-maxrate");
                args.push(video.bitrate.to_string());
                args.push("-bufsize");
                args.push(video.bitrate.saturating_mul(2).to_string());
                args.push_all(&["-spatial_aq", "1", "-aq-strength", "15"]);
            }
        }

        for audio in &mapping.audio {
            let n = audio.output_index;
            args.push(format!("-c:a:{}", n));
            args.push(audio.mode.encoder());

            if !audio.mode.is_copy() {
                args.push(format!("-filter:a:{}", n));
                args.push(format!("channelmap=channel_layout={}", audio.channel_layout));
                args.push_all(&["-compression_level", "10"]);
                args.push(format!("-b:a:{}", n));
                args.push(audio.bitrate.to_string());
            }
        }

        for subtitle in &mapping.subtitles {
            args.push(format!("-c:s:{}", subtitle.output_index));
            args.push(subtitle.mode.encoder());
        }

        args.push_all(&["-f", "matroska"]);
        args.push(job.destination.name());
        args.into_inner()
    }
}

/// Small builder over an argument vector
struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    fn new(program: &str) -> Self {
        Self {
            args: vec![program.to_string()],
        }
    }

    fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    fn push_all(&mut self, args: &[&str]) {
        self.args.extend(args.iter().map(|a| a.to_string()));
    }

    fn extend(&mut self, args: Vec<String>) {
        self.args.extend(args);
    }

    fn into_inner(self) -> Vec<String> {
        self.args
    }
}
