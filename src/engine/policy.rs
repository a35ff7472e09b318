//! Plugin variants and their fixed flag tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// The re-encode plugin variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// HEVC on NVENC, audio untouched
    HevcNvenc,
    /// HEVC on NVENC with cuvid decode, audio to Opus
    HevcNvencOpus,
    /// PCM audio to Opus, video untouched
    Opus,
    /// Loudness normalization with ffmpeg-normalize
    Normalize,
    /// EBU R128 normalization straight to Opus
    OpusNormalize,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::HevcNvenc,
        Variant::HevcNvencOpus,
        Variant::Opus,
        Variant::Normalize,
        Variant::OpusNormalize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::HevcNvenc => "hevc-nvenc",
            Variant::HevcNvencOpus => "hevc-nvenc-opus",
            Variant::Opus => "opus",
            Variant::Normalize => "normalize",
            Variant::OpusNormalize => "opus-normalize",
        }
    }

    /// Flag table for this variant
    pub fn policy(&self) -> VariantPolicy {
        match self {
            Variant::HevcNvenc => VariantPolicy {
                variant: *self,
                tool: Tool::Ffmpeg,
                hwaccel: HwAccel::Cuda,
                video: VideoPolicy::Hevc { rate_control: "vbr" },
                audio: AudioPolicy::Copy,
                skip_name_markers: HEVC_NAME_MARKERS,
                reject_video_codecs: &["hevc"],
                reject_audio_codecs: &[],
                progress: ProgressKind::Elapsed,
            },
            Variant::HevcNvencOpus => VariantPolicy {
                variant: *self,
                tool: Tool::Ffmpeg,
                hwaccel: HwAccel::Cuvid,
                video: VideoPolicy::Hevc { rate_control: "vbr_hq" },
                audio: AudioPolicy::Opus { only: None },
                skip_name_markers: HEVC_NAME_MARKERS,
                reject_video_codecs: &["hevc"],
                reject_audio_codecs: &[],
                progress: ProgressKind::Elapsed,
            },
            Variant::Opus => VariantPolicy {
                variant: *self,
                tool: Tool::Ffmpeg,
                hwaccel: HwAccel::None,
                video: VideoPolicy::Copy,
                audio: AudioPolicy::Opus {
                    only: Some(&["pcm_s16le", "pcm_s32le"]),
                },
                skip_name_markers: &[],
                reject_video_codecs: &[],
                reject_audio_codecs: &["opus"],
                progress: ProgressKind::Elapsed,
            },
            Variant::Normalize => VariantPolicy {
                variant: *self,
                tool: Tool::FfmpegNormalize {
                    extra_args: &["-v", "-pr"],
                },
                hwaccel: HwAccel::None,
                video: VideoPolicy::Copy,
                audio: AudioPolicy::Copy,
                skip_name_markers: &[],
                reject_video_codecs: &[],
                reject_audio_codecs: &["opus", "pcm_s16le"],
                progress: ProgressKind::Pass,
            },
            Variant::OpusNormalize => VariantPolicy {
                variant: *self,
                tool: Tool::FfmpegNormalize {
                    extra_args: &["-v", "-nt", "ebu", "-c:a", "libopus", "-b:a", "320k", "-ar", "48000"],
                },
                hwaccel: HwAccel::None,
                video: VideoPolicy::Copy,
                audio: AudioPolicy::Copy,
                skip_name_markers: &[],
                reject_video_codecs: &[],
                reject_audio_codecs: &[],
                progress: ProgressKind::Pass,
            },
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::HevcNvenc
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Variant::ALL
            .iter()
            .find(|v| v.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Unknown variant '{}', expected one of: {}",
                    s,
                    Variant::ALL.map(|v| v.as_str()).join(", ")
                ))
            })
    }
}

/// Filename fragments that mark a file as already HEVC
pub const HEVC_NAME_MARKERS: &[&str] = &["hevc", "x265", "h265"];

/// External program the variant drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    /// `ffmpeg-normalize <in> -o <out>` followed by these flags
    FfmpegNormalize { extra_args: &'static [&'static str] },
}

/// Hardware decode flags placed before the primary input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwAccel {
    None,
    /// `-hwaccel cuda -hwaccel_output_format cuda`, always
    Cuda,
    /// `-hwaccel cuvid -c:v:i <decoder>` per video stream with a cuvid decoder
    Cuvid,
}

impl HwAccel {
    /// cuvid decoder for a source codec, if there is one
    pub fn cuvid_decoder(codec: &str) -> Option<&'static str> {
        match codec {
            "h264" => Some("h264_cuvid"),
            "mpeg2" | "mpeg2video" => Some("mpeg2_cuvid"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPolicy {
    Copy,
    /// hevc_nvenc with the given `-rc` mode
    Hevc { rate_control: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioPolicy {
    Copy,
    /// libopus for `only` codecs, or for everything that is not opus yet
    Opus { only: Option<&'static [&'static str]> },
}

/// Which progress parser reads the tool's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    /// `time=` against the probed length
    Elapsed,
    /// Multi-pass, multi-stream weighting
    Pass,
}

/// Fixed table of flag values for one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantPolicy {
    pub variant: Variant,
    pub tool: Tool,
    pub hwaccel: HwAccel,
    pub video: VideoPolicy,
    pub audio: AudioPolicy,
    /// Case-insensitive filename fragments that skip the file before probing
    pub skip_name_markers: &'static [&'static str],
    /// Probed video codecs that mean the work is already done
    pub reject_video_codecs: &'static [&'static str],
    /// Probed audio codecs that mean the work is already done
    pub reject_audio_codecs: &'static [&'static str],
    pub progress: ProgressKind,
}

impl VariantPolicy {
    /// Whether the check phase needs probe results
    pub fn needs_probe(&self) -> bool {
        !self.reject_video_codecs.is_empty() || !self.reject_audio_codecs.is_empty()
    }
}
