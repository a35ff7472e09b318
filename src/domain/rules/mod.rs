// Domain rules - Channel inference and bitrate sanity policy

use std::sync::OnceLock;

use regex::Regex;

/// Bits per second granted to each audio channel before the sanity clamp
pub const AUDIO_BITRATE_PER_CHANNEL: u64 = 64_000;
pub const MIN_AUDIO_BITRATE: u64 = 96_000;
pub const MAX_AUDIO_BITRATE: u64 = 320_000;

/// Inclusive upper width bound -> video bitrate ceiling
const VIDEO_BITRATE_CEILINGS: &[(u32, u64)] = &[
    (544, 1_352_000),
    (720, 1_789_000),
    (1280, 3_977_000),
    (1920, 8_948_000),
    (3840, 35_795_000),
];

fn layout_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9])\.([0-9])").expect("valid layout regex"))
}

/// Channel count and layout after cross-inference
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelResolution {
    pub channels: u32,
    pub layout: String,
    /// Set when a layout string could not be interpreted and stereo was assumed
    pub fallback: bool,
}

/// Fills whichever of channel count / layout the probe left out
pub struct ChannelLayoutRules;

impl ChannelLayoutRules {
    /// Channel count implied by a layout label
    pub fn channels_from_layout(layout: &str) -> Option<u32> {
        match layout {
            "stereo" => Some(2),
            "mono" => Some(1),
            _ => layout_pattern().captures(layout).and_then(|caps| {
                let front = caps.get(1)?.as_str().parse::<u32>().ok()?;
                let lfe = caps.get(2)?.as_str().parse::<u32>().ok()?;
                Some(front + lfe)
            }),
        }
    }

    /// Layout label for a channel count
    pub fn layout_from_channels(channels: u32) -> &'static str {
        match channels {
            8 => "7.1",
            7 => "6.1",
            6 => "5.1",
            _ => "stereo",
        }
    }

    pub fn resolve(channels: Option<u32>, layout: Option<&str>) -> ChannelResolution {
        let channels = channels.filter(|c| *c > 0);
        let layout = layout.map(str::trim).filter(|l| !l.is_empty());

        match (channels, layout) {
            (Some(channels), Some(layout)) => ChannelResolution {
                channels,
                layout: layout.to_string(),
                fallback: false,
            },
            (Some(channels), None) => ChannelResolution {
                channels,
                layout: Self::layout_from_channels(channels).to_string(),
                fallback: false,
            },
            (None, Some(layout)) => match Self::channels_from_layout(layout) {
                Some(channels) if channels > 0 => ChannelResolution {
                    channels,
                    layout: layout.to_string(),
                    fallback: false,
                },
                _ => ChannelResolution {
                    channels: 2,
                    layout: layout.to_string(),
                    fallback: true,
                },
            },
            (None, None) => ChannelResolution {
                channels: 2,
                layout: "stereo".to_string(),
                fallback: false,
            },
        }
    }

    /// Strip extension annotations: "5.1(side)" -> "5.1"
    pub fn sanitize(layout: &str) -> &str {
        match layout.find('(') {
            Some(pos) => layout[..pos].trim_end(),
            None => layout,
        }
    }
}

/// Bitrate sanity policy applied after probing
pub struct BitrateRules;

impl BitrateRules {
    /// Probed bitrate capped at the per-channel budget, or the budget itself
    pub fn initial_audio_bitrate(probed: Option<u64>, channels: u32) -> u64 {
        let budget = AUDIO_BITRATE_PER_CHANNEL * u64::from(channels);
        match probed {
            Some(bitrate) => bitrate.min(budget),
            None => budget,
        }
    }

    pub fn clamp_audio(bitrate: u64) -> u64 {
        bitrate.clamp(MIN_AUDIO_BITRATE, MAX_AUDIO_BITRATE)
    }

    /// Ceiling for a given width; `None` for unknown or wider than 4K
    pub fn video_ceiling(width: u32) -> Option<u64> {
        if width == 0 {
            return None;
        }
        VIDEO_BITRATE_CEILINGS
            .iter()
            .find(|(max_width, _)| width <= *max_width)
            .map(|(_, ceiling)| *ceiling)
    }

    pub fn cap_video(bitrate: u64, width: u32) -> u64 {
        match Self::video_ceiling(width) {
            Some(ceiling) => bitrate.min(ceiling),
            None => bitrate,
        }
    }

    /// Share of the overall bitrate left for each video stream without one.
    /// `None` when there is nothing to share between.
    pub fn backfill_share(overall: u64, known_video: u64, audio_total: u64, unknown_count: usize) -> Option<u64> {
        if unknown_count == 0 {
            return None;
        }
        let remaining = overall.saturating_sub(known_video).saturating_sub(audio_total);
        Some(remaining / unknown_count as u64)
    }
}
