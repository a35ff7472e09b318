//! Process execution adapter
//!
//! Runs the synthesized command and streams its combined stdout/stderr into a
//! progress parser. ffmpeg redraws its status line with `\r`, so both `\r` and
//! `\n` end a line.

use std::collections::VecDeque;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::engine::progress::ProgressParser;
use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::ExecutePort;

/// Output lines kept for the error report of a failed run
const TAIL_LINES: usize = 20;

/// Runs external tools as child processes
#[derive(Debug, Default)]
pub struct ProcessExecAdapter;

impl ProcessExecAdapter {
    /// Create new execution adapter
    pub fn new() -> Self {
        Self
    }
}

impl ExecutePort for ProcessExecAdapter {
    fn execute(
        &self,
        args: &[String],
        parser: &mut dyn ProgressParser,
        on_progress: &mut dyn FnMut(u8),
    ) -> ReencodeResult<()> {
        let (program, rest) = args.split_first().ok_or_else(|| ReencodeError::Execution {
            message: "empty command".to_string(),
        })?;

        info!(command = %args.join(" "), "Starting transcode");
        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReencodeError::Execution {
                message: format!("cannot start {}: {}", program, e),
            })?;

        let (tx, rx) = mpsc::channel();
        let mut pumps = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            pumps.push(pump_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(pump_lines(stderr, tx.clone()));
        }
        drop(tx);

        let mut tail = VecDeque::with_capacity(TAIL_LINES);
        let mut last = parser.percent();
        for line in rx {
            let percent = parser.parse(&line);
            if percent != last {
                last = percent;
                on_progress(percent);
            }
            if tail.len() == TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        for pump in pumps {
            if pump.join().is_err() {
                warn!("Output reader thread panicked");
            }
        }

        let status = child.wait()?;
        if !status.success() {
            let tail: Vec<String> = tail.into_iter().collect();
            return Err(ReencodeError::Execution {
                message: format!("{} exited with {}: {}", program, status, tail.join(" | ")),
            });
        }

        debug!(percent = last, "Transcode finished");
        Ok(())
    }
}

fn pump_lines<R: Read + Send + 'static>(mut reader: R, tx: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut splitter = LineSplitter::default();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            for line in splitter.feed(&chunk[..n]) {
                if tx.send(line).is_err() {
                    return;
                }
            }
        }
        if let Some(line) = splitter.finish() {
            let _ = tx.send(line);
        }
    })
}

/// Splits a byte stream on `\n` and `\r`, dropping empty lines
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                if !self.pending.is_empty() {
                    lines.push(String::from_utf8_lossy(&self.pending).into_owned());
                    self.pending.clear();
                }
            } else {
                self.pending.push(byte);
            }
        }
        lines
    }

    /// Whatever is left after the stream ends
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(line)
    }
}
