//! reencoder library
//!
//! Probes media files with ffprobe, normalizes the result into a stream model,
//! decides whether a file needs work under one of the re-encode plugin
//! variants, and synthesizes the ffmpeg or ffmpeg-normalize command together
//! with a parser for its progress output.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod probe;
pub mod streams;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    AudioStream, FileEntry, MediaFile, MediaInfo, SubtitleFile, SubtitleStream, TranscodeJob, TranscodeResult,
    VideoStream,
};
pub use engine::{CommandSynthesizer, ProgressParser, Variant, VariantPolicy};
pub use error::{ReencodeError, ReencodeResult};
pub use probe::Normalizer;
