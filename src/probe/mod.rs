//! ffprobe output schema, probe invocation arguments and the normalizer

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

pub mod inspector;
pub mod validator;

pub use inspector::Normalizer;

/// Probing window for ordinary sources
const PROBE_WINDOW: &str = "250M";
/// DVD sources hide streams deep in the file and need a wider window
const PROBE_WINDOW_VOB: &str = "500M";

/// `-analyzeduration` / `-probesize` pair shared by ffprobe and ffmpeg
pub fn probe_window_args(vob: bool) -> Vec<String> {
    let window = if vob { PROBE_WINDOW_VOB } else { PROBE_WINDOW };
    vec![
        "-analyzeduration".to_string(),
        window.to_string(),
        "-probesize".to_string(),
        window.to_string(),
    ]
}

/// Full ffprobe argument list, program first
pub fn probe_args(ffprobe: &str, file_path: &str, vob: bool) -> Vec<String> {
    let mut args: Vec<String> = [
        ffprobe,
        "-v",
        "quiet",
        "-hide_banner",
        "-show_format",
        "-show_streams",
        "-print_format",
        "json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.extend(probe_window_args(vob));
    args.push("-i".to_string());
    args.push(file_path.to_string());
    args
}

/// Top-level ffprobe JSON document
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeOutput {
    pub format: Option<ProbeFormat>,
    pub streams: Option<Vec<ProbeStream>>,
}

/// `format` object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bit_rate: Option<u64>,
}

/// One entry of the `streams` array
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub index: Option<u64>,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bit_rate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub channels: Option<u64>,
    pub channel_layout: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, serde_json::Value>,
}

impl ProbeStream {
    pub fn codec(&self) -> &str {
        self.codec_name.as_deref().unwrap_or("")
    }

    pub fn language_tag(&self) -> Option<&str> {
        self.tags.get("language").and_then(|v| v.as_str())
    }
}

/// ffprobe prints most numbers as strings; accept both, and "N/A" as absent
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(u64),
    Float(f64),
    Text(String),
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Int(n)) => Ok(Some(n)),
        Some(NumberOrText::Float(f)) if f >= 0.0 => Ok(Some(f as u64)),
        Some(NumberOrText::Float(f)) => Err(serde::de::Error::custom(format!("negative value {}", f))),
        Some(NumberOrText::Text(s)) => parse_text(&s, |t| t.parse::<u64>().ok()),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Int(n)) => Ok(Some(n as f64)),
        Some(NumberOrText::Float(f)) => Ok(Some(f)),
        Some(NumberOrText::Text(s)) => parse_text(&s, |t| t.parse::<f64>().ok().filter(|f| f.is_finite())),
    }
}

fn parse_text<T, E, F>(text: &str, parse: F) -> Result<Option<T>, E>
where
    E: serde::de::Error,
    F: Fn(&str) -> Option<T>,
{
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
        return Ok(None);
    }
    parse(text)
        .map(Some)
        .ok_or_else(|| E::custom(format!("expected a number, found '{}'", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_args_window() {
        let args = probe_args("ffprobe", "/dvd/VTS_01_1.vob", true);
        assert_eq!(args[0], "ffprobe");
        assert!(args.windows(2).any(|w| w == ["-analyzeduration", "500M"]));
        assert_eq!(args[args.len() - 2..], ["-i".to_string(), "/dvd/VTS_01_1.vob".to_string()]);

        let args = probe_args("ffprobe", "/tv/show.mkv", false);
        assert!(args.windows(2).any(|w| w == ["-probesize", "250M"]));
    }

    #[test]
    fn test_strings_and_numbers_both_parse() {
        let raw = r#"{
            "format": {"size": "1048576", "duration": "60.5", "bit_rate": "N/A"},
            "streams": [{"index": 0, "codec_type": "video", "codec_name": "h264",
                         "bit_rate": "4000000", "width": 1920, "height": 1080}]
        }"#;
        let output: ProbeOutput = serde_json::from_str(raw).unwrap();
        let format = output.format.unwrap();
        assert_eq!(format.size, Some(1_048_576));
        assert_eq!(format.duration, Some(60.5));
        assert_eq!(format.bit_rate, None);

        let stream = &output.streams.unwrap()[0];
        assert_eq!(stream.bit_rate, Some(4_000_000));
        assert_eq!(stream.width, Some(1920));
        assert_eq!(stream.language_tag(), None);
    }

    #[test]
    fn test_garbage_number_is_an_error() {
        let raw = r#"{"format": {"size": "lots"}, "streams": []}"#;
        assert!(serde_json::from_str::<ProbeOutput>(raw).is_err());
    }
}
