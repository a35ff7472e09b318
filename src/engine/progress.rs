//! Progress parsers for the transcode tools' textual output
//!
//! Both parsers are fed one line at a time and always answer with the current
//! percentage. Lines they do not recognize leave the value unchanged. Computed
//! values are bounded to 0..=100 and never move backwards.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;

use crate::engine::policy::ProgressKind;
use crate::ports::LogPort;
use crate::utils::time::TimeParser;
use crate::utils::Utils;

/// Incremental line consumer reporting a completion percentage
pub trait ProgressParser: Send {
    /// Consume one line and return the current percentage
    fn parse(&mut self, line: &str) -> u8;

    /// Last reported percentage
    fn percent(&self) -> u8;
}

/// Snapshot handed to progress consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub percent: u8,
}

impl ProgressKind {
    /// Parser for this kind; `length` is the probed duration in seconds
    pub fn parser(&self, length: f64, log: Arc<dyn LogPort>) -> Box<dyn ProgressParser> {
        match self {
            ProgressKind::Elapsed => Box::new(ElapsedProgressParser::new(length, log)),
            ProgressKind::Pass => Box::new(PassProgressParser::new(log)),
        }
    }
}

fn stream_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Stream [0-9]+/([0-9]+)").expect("valid stream count regex"))
}

fn current_stream_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Stream ([0-9]+)/[0-9]+").expect("valid stream regex"))
}

fn first_pass_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)first pass").expect("valid first pass regex"))
}

fn second_pass_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)second pass").expect("valid second pass regex"))
}

fn percent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9]{1,3})%").expect("valid percent regex"))
}

fn elapsed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"time=([0-9:.]+)").expect("valid time regex"))
}

/// Pass reached by a two-pass loudness run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassState {
    Initial,
    FirstPass,
    SecondPass,
}

/// Weighted parser for ffmpeg-normalize: one schedule slot per stream in the
/// first pass plus one for the second pass
pub struct PassProgressParser {
    total_streams: Option<u32>,
    total_steps: u32,
    state: PassState,
    current_step: u32,
    last_percent: u8,
    log: Arc<dyn LogPort>,
}

impl PassProgressParser {
    pub fn new(log: Arc<dyn LogPort>) -> Self {
        Self {
            total_streams: None,
            total_steps: 0,
            state: PassState::Initial,
            current_step: 0,
            last_percent: 0,
            log,
        }
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn total_streams(&self) -> Option<u32> {
        self.total_streams
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    fn weighted(&self, local_percent: u32) -> f64 {
        let steps = f64::from(self.total_steps);
        let offset = 100.0 / steps;
        f64::from(local_percent) / steps + offset * f64::from(self.current_step) - offset
    }
}

impl ProgressParser for PassProgressParser {
    fn parse(&mut self, line: &str) -> u8 {
        if self.total_streams.is_none() {
            if let Some(count) = stream_count_pattern()
                .captures(line)
                .and_then(|c| c[1].parse::<u32>().ok())
            {
                self.total_streams = Some(count);
                self.total_steps = count + 1;
                self.log.debug(&format!("Streams: {}", count));
            }
        }

        if self.state == PassState::Initial && first_pass_pattern().is_match(line) {
            self.log.debug("First pass");
            self.state = PassState::FirstPass;
            self.current_step = 1;
        }

        if self.state == PassState::FirstPass {
            if second_pass_pattern().is_match(line) {
                self.log.debug("Second pass");
                self.state = PassState::SecondPass;
                self.current_step = self.total_steps.saturating_sub(1);
            }

            if let Some(stream) = current_stream_pattern()
                .captures(line)
                .and_then(|c| c[1].parse::<u32>().ok())
            {
                self.log.debug(&format!("Stream: {}", stream));
                self.current_step = stream;
            }
        }

        let local = percent_pattern()
            .captures(line)
            .and_then(|c| c[1].parse::<u32>().ok());

        if let Some(local) = local {
            if self.total_steps > 0 {
                let percent = Utils::bound_percent(self.weighted(local));
                self.last_percent = self.last_percent.max(percent);
            }
        }

        self.last_percent
    }

    fn percent(&self) -> u8 {
        self.last_percent
    }
}

/// Single-pass parser for ffmpeg: `time=` position against the known length
pub struct ElapsedProgressParser {
    length: f64,
    last_percent: u8,
    time_parser: TimeParser,
    log: Arc<dyn LogPort>,
}

impl ElapsedProgressParser {
    pub fn new(length: f64, log: Arc<dyn LogPort>) -> Self {
        Self {
            length,
            last_percent: 0,
            time_parser: TimeParser::new(),
            log,
        }
    }
}

impl ProgressParser for ElapsedProgressParser {
    fn parse(&mut self, line: &str) -> u8 {
        if self.length <= 0.0 {
            return self.last_percent;
        }

        let Some(caps) = elapsed_pattern().captures(line) else {
            return self.last_percent;
        };

        match self.time_parser.parse_clock(&caps[1]) {
            Some(elapsed) => {
                let percent = Utils::bound_percent(elapsed / self.length * 100.0);
                self.last_percent = self.last_percent.max(percent);
            }
            None => self.log.debug(&format!("Unreadable progress time '{}'", &caps[1])),
        }

        self.last_percent
    }

    fn percent(&self) -> u8 {
        self.last_percent
    }
}
