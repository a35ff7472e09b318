// Domain models - Stream, file and job records shared by every plugin variant

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::utils::Utils;

/// Language code used when a subtitle track carries no language tag
pub const UNKNOWN_LANGUAGE: &str = "unk";

/// Elementary stream capability: a position in the container plus a codec
pub trait Stream {
    /// Position of the stream in the container
    fn index(&self) -> usize;

    /// Codec name, empty when unknown
    fn codec(&self) -> &str;

    /// One-line description used in file summaries
    fn describe(&self) -> String {
        format!("Index: {}, Codec: {}", self.index(), self.codec())
    }
}

/// Stream that carries a bitrate (video and audio)
pub trait MediaStream: Stream {
    /// Bits per second, 0 while undetermined
    fn bitrate(&self) -> u64;

    fn set_bitrate(&mut self, bitrate: u64);

    fn describe_bitrate(&self) -> String {
        format!("Bitrate: {}", Utils::format_bitrate(self.bitrate()))
    }
}

/// Video stream information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStream {
    pub index: usize,
    pub codec: String,
    pub bitrate: u64,
    /// Width in pixels, 0 when unknown
    pub width: u32,
    /// Height in pixels, 0 when unknown
    pub height: u32,
}

impl VideoStream {
    pub fn new(index: usize, codec: impl Into<String>, bitrate: u64, width: u32, height: u32) -> Self {
        Self {
            index,
            codec: codec.into(),
            bitrate,
            width,
            height,
        }
    }

    /// Whether the probe reported a width for this stream
    pub fn has_known_width(&self) -> bool {
        self.width > 0
    }
}

impl Stream for VideoStream {
    fn index(&self) -> usize {
        self.index
    }

    fn codec(&self) -> &str {
        &self.codec
    }
}

impl MediaStream for VideoStream {
    fn bitrate(&self) -> u64 {
        self.bitrate
    }

    fn set_bitrate(&mut self, bitrate: u64) {
        self.bitrate = bitrate;
    }
}

impl fmt::Display for VideoStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, Width: {}, Height: {}",
            self.describe(),
            self.describe_bitrate(),
            self.width,
            self.height
        )
    }
}

/// Audio stream information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioStream {
    pub index: usize,
    pub codec: String,
    pub bitrate: u64,
    pub channels: u32,
    /// Canonical layout label such as "stereo" or "5.1(side)"
    pub channel_layout: String,
}

impl AudioStream {
    /// Create new audio stream info with validation
    pub fn new(
        index: usize,
        codec: impl Into<String>,
        bitrate: u64,
        channels: u32,
        channel_layout: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if channels == 0 {
            return Err(DomainError::ValidationFailed(
                "Channel count cannot be zero".to_string(),
            ));
        }

        let channel_layout = channel_layout.into();
        if channel_layout.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "Channel layout cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            index,
            codec: codec.into(),
            bitrate,
            channels,
            channel_layout,
        })
    }
}

impl Stream for AudioStream {
    fn index(&self) -> usize {
        self.index
    }

    fn codec(&self) -> &str {
        &self.codec
    }
}

impl MediaStream for AudioStream {
    fn bitrate(&self) -> u64 {
        self.bitrate
    }

    fn set_bitrate(&mut self, bitrate: u64) {
        self.bitrate = bitrate;
    }
}

impl fmt::Display for AudioStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, Channels: {}, Channel Layout: {}",
            self.describe(),
            self.describe_bitrate(),
            self.channels,
            self.channel_layout
        )
    }
}

/// Subtitle stream information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleStream {
    pub index: usize,
    pub codec: String,
    language: String,
}

impl SubtitleStream {
    /// Create a subtitle stream; `None` language means unknown
    pub fn new(index: usize, codec: impl Into<String>, language: Option<&str>) -> Result<Self, DomainError> {
        let language = match language {
            Some(lang) => Self::validate_language(lang)?,
            None => UNKNOWN_LANGUAGE.to_string(),
        };

        Ok(Self {
            index,
            codec: codec.into(),
            language,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Replace the language code, rejecting anything but three characters
    pub fn set_language(&mut self, language: &str) -> Result<(), DomainError> {
        self.language = Self::validate_language(language)?;
        Ok(())
    }

    fn validate_language(language: &str) -> Result<String, DomainError> {
        if language.chars().count() != 3 {
            return Err(DomainError::ValidationFailed(format!(
                "Language '{}' should be a 3-letter ISO 639-2 code",
                language
            )));
        }
        Ok(language.to_string())
    }
}

impl Stream for SubtitleStream {
    fn index(&self) -> usize {
        self.index
    }

    fn codec(&self) -> &str {
        &self.codec
    }
}

impl fmt::Display for SubtitleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Language: {}", self.describe(), self.language)
    }
}

/// A named file on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    /// Full path as given by the host
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
        }
    }

    /// Directory containing the file
    pub fn path(&self) -> &Path {
        Path::new(&self.name).parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File: {}, Size: {}", self.name, Utils::format_file_size(self.size))
    }
}

/// External subtitle track: a file plus the attributes of a subtitle stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleFile {
    pub file: FileEntry,
    pub stream: SubtitleStream,
    /// Detected text encoding, empty until detected
    pub encoding: String,
}

impl SubtitleFile {
    pub fn new(name: impl Into<String>, codec: impl Into<String>) -> Self {
        Self {
            file: FileEntry::new(name),
            stream: SubtitleStream {
                index: 0,
                codec: codec.into(),
                language: UNKNOWN_LANGUAGE.to_string(),
            },
            encoding: String::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }
}

impl fmt::Display for SubtitleFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, Encoding: {}", self.file, self.stream, self.encoding)
    }
}

/// Stream inventory produced by one successful probe pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    /// Duration in seconds, 0.0 when the probe did not report one
    pub length: f64,
    /// Overall container bitrate, if reported
    pub overall_bitrate: Option<u64>,
    pub video_streams: Vec<VideoStream>,
    pub audio_streams: Vec<AudioStream>,
    pub subtitle_streams: Vec<SubtitleStream>,
}

impl MediaInfo {
    /// Get total number of streams
    pub fn total_streams(&self) -> usize {
        self.video_streams.len() + self.audio_streams.len() + self.subtitle_streams.len()
    }
}

/// A media file: created with a name, populated once from a probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFile {
    pub file: FileEntry,
    info: Option<MediaInfo>,
    subtitle_files: Vec<SubtitleFile>,
}

impl MediaFile {
    /// Create an unpopulated media file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            file: FileEntry::new(name),
            info: None,
            subtitle_files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn size(&self) -> u64 {
        self.file.size
    }

    /// Whether the name carries the DVD `.vob` marker that widens probing
    pub fn is_vob(&self) -> bool {
        self.file.name.to_lowercase().contains(".vob")
    }

    pub fn is_populated(&self) -> bool {
        self.info.is_some()
    }

    /// Attach probe results. Returns false and leaves the file untouched if it
    /// was already populated.
    pub fn populate(&mut self, size: u64, info: MediaInfo) -> bool {
        if self.info.is_some() {
            return false;
        }
        self.file.size = size;
        self.info = Some(info);
        true
    }

    pub fn info(&self) -> Option<&MediaInfo> {
        self.info.as_ref()
    }

    /// Probe results, or an error for a file that was never populated
    pub fn require_info(&self) -> Result<&MediaInfo, DomainError> {
        self.info.as_ref().ok_or_else(|| {
            DomainError::BadArgs(format!("Media info for {} has not been populated", self.file.name))
        })
    }

    pub fn length(&self) -> f64 {
        self.info.as_ref().map(|info| info.length).unwrap_or(0.0)
    }

    pub fn video_streams(&self) -> &[VideoStream] {
        self.info.as_ref().map(|i| i.video_streams.as_slice()).unwrap_or(&[])
    }

    pub fn audio_streams(&self) -> &[AudioStream] {
        self.info.as_ref().map(|i| i.audio_streams.as_slice()).unwrap_or(&[])
    }

    pub fn subtitle_streams(&self) -> &[SubtitleStream] {
        self.info.as_ref().map(|i| i.subtitle_streams.as_slice()).unwrap_or(&[])
    }

    pub fn subtitle_files(&self) -> &[SubtitleFile] {
        &self.subtitle_files
    }

    pub fn append_subtitle_file(&mut self, subtitle_file: SubtitleFile) {
        self.subtitle_files.push(subtitle_file);
    }

    /// Every stream and subtitle file, one description per entry, in order
    pub fn summary(&self) -> String {
        let mut parts = vec![self.file.to_string(), format!("Length: {}", self.length())];
        parts.extend(self.video_streams().iter().map(|s| s.to_string()));
        parts.extend(self.audio_streams().iter().map(|s| s.to_string()));
        parts.extend(self.subtitle_streams().iter().map(|s| s.to_string()));
        parts.extend(self.subtitle_files.iter().map(|s| s.to_string()));
        parts.join(", ")
    }
}

impl fmt::Display for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Accept/reject outcome of a check or build phase, with a reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodeResult {
    pub status: bool,
    pub message: String,
}

impl TranscodeResult {
    pub fn accept(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

impl Default for TranscodeResult {
    fn default() -> Self {
        Self::accept("")
    }
}

impl fmt::Display for TranscodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.status { "accepted" } else { "rejected" };
        write!(f, "{}: {}", verdict, self.message)
    }
}

/// One source file, its destination, and the command that links them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodeJob {
    pub source: MediaFile,
    pub destination: MediaFile,
    pub args: Vec<String>,
    pub result: TranscodeResult,
}

impl TranscodeJob {
    pub fn new(source: MediaFile, destination: MediaFile) -> Self {
        Self {
            source,
            destination,
            args: Vec::new(),
            result: TranscodeResult::default(),
        }
    }
}

#[cfg(test)]
mod tests;
