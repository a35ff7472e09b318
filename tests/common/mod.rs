//! Shared fixtures and fake ports for the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use reencoder::app::Ports;
use reencoder::engine::progress::ProgressParser;
use reencoder::error::{ReencodeError, ReencodeResult};
use reencoder::ports::{ExecutePort, FsPort, LogPort, ProbePort};

pub const MOVIE: &str = "/media/Movie.mkv";
pub const MOVIE_OUT: &str = "/media/out/Movie.mkv";

/// ffprobe report for a typical film: h264 video without a bitrate, 5.1 AC-3,
/// an English SubRip track, an embedded cover image, and a mov_text track
/// with a two-letter language tag
pub fn movie_probe() -> String {
    probe_json(
        json!({"size": "1073741824", "duration": "5400.000000", "bit_rate": "10000000"}),
        vec![
            json!({"index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080}),
            json!({"index": 1, "codec_type": "audio", "codec_name": "ac3", "bit_rate": "640000",
                   "channels": 6, "channel_layout": "5.1(side)"}),
            json!({"index": 2, "codec_type": "subtitle", "codec_name": "subrip", "tags": {"language": "eng"}}),
            json!({"index": 3, "codec_type": "video", "codec_name": "mjpeg", "width": 600, "height": 600}),
            json!({"index": 4, "codec_type": "subtitle", "codec_name": "mov_text", "tags": {"language": "en"}}),
        ],
    )
}

/// Stereo PCM concert recording with an already-HEVC video stream
pub fn hevc_pcm_probe() -> String {
    probe_json(
        json!({"size": 524288000, "duration": "3600.5", "bit_rate": 4000000}),
        vec![
            json!({"index": 0, "codec_type": "video", "codec_name": "hevc", "bit_rate": "3000000", "width": 1280, "height": 720}),
            json!({"index": 1, "codec_type": "audio", "codec_name": "pcm_s16le", "bit_rate": "1536000", "channels": 2}),
        ],
    )
}

pub fn probe_json(format: Value, streams: Vec<Value>) -> String {
    json!({"format": format, "streams": streams}).to_string()
}

/// Probe port answering from canned reports keyed by path
#[derive(Default)]
pub struct FakeProbe {
    reports: HashMap<String, String>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, report: String) -> Self {
        self.reports.insert(path.to_string(), report);
        self
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProbePort for FakeProbe {
    fn probe(&self, file_path: &str, vob_hint: bool) -> ReencodeResult<String> {
        self.calls.lock().unwrap().push((file_path.to_string(), vob_hint));
        self.reports.get(file_path).cloned().ok_or_else(|| ReencodeError::ProbeFailed {
            path: file_path.to_string(),
            message: "exit status: 1".to_string(),
        })
    }
}

/// In-memory filesystem: a set of files with contents, directories implied
#[derive(Default)]
pub struct FakeFs {
    files: HashMap<String, Vec<u8>>,
    dirs: HashSet<String>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: &[u8]) -> Self {
        let mut dir = std::path::Path::new(path).parent();
        while let Some(d) = dir {
            self.dirs.insert(d.to_string_lossy().to_string());
            dir = d.parent();
        }
        self.files.insert(path.to_string(), contents.to_vec());
        self
    }
}

impl FsPort for FakeFs {
    fn file_exists(&self, file_path: &str) -> bool {
        self.files.contains_key(file_path) || self.dirs.contains(file_path)
    }

    fn file_size(&self, file_path: &str) -> ReencodeResult<u64> {
        self.files
            .get(file_path)
            .map(|c| c.len() as u64)
            .ok_or_else(|| ReencodeError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))
    }

    fn list_files(&self, dir_path: &str, _max_depth: usize) -> ReencodeResult<Vec<String>> {
        let mut files: Vec<String> = self
            .files
            .keys()
            .filter(|p| {
                std::path::Path::new(p.as_str())
                    .parent()
                    .map(|d| d.to_string_lossy() == dir_path)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_bytes(&self, file_path: &str) -> ReencodeResult<Vec<u8>> {
        self.files
            .get(file_path)
            .cloned()
            .ok_or_else(|| ReencodeError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))
    }
}

/// Log port that keeps every line for assertions
#[derive(Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at("warn")
    }

    fn push(&self, level: &'static str, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl LogPort for RecordingLog {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }

    fn debug(&self, message: &str) {
        self.push("debug", message);
    }
}

/// Execute port that replays canned tool output instead of spawning
pub struct ScriptedExec {
    output: Vec<String>,
    pub commands: Mutex<Vec<Vec<String>>>,
}

impl ScriptedExec {
    pub fn new(output: &[&str]) -> Self {
        Self {
            output: output.iter().map(|l| l.to_string()).collect(),
            commands: Mutex::new(Vec::new()),
        }
    }
}

impl ExecutePort for ScriptedExec {
    fn execute(
        &self,
        args: &[String],
        parser: &mut dyn ProgressParser,
        on_progress: &mut dyn FnMut(u8),
    ) -> ReencodeResult<()> {
        self.commands.lock().unwrap().push(args.to_vec());
        let mut last = parser.percent();
        for line in &self.output {
            let percent = parser.parse(line);
            if percent != last {
                last = percent;
                on_progress(percent);
            }
        }
        Ok(())
    }
}

/// Port set built from the fakes
pub fn ports(probe: FakeProbe, fs: FakeFs, exec: Arc<ScriptedExec>, log: Arc<RecordingLog>) -> Ports {
    Ports {
        probe: Arc::new(probe),
        execute: exec,
        fs: Arc::new(fs),
        log,
    }
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
