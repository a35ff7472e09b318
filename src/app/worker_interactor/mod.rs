// Worker interactor - Host-protocol worker phase: gate, build, run

use std::fmt;
use std::sync::Arc;

use crate::app::check_interactor::CheckInteractor;
use crate::domain::model::{MediaFile, TranscodeJob, TranscodeResult};
use crate::engine::command::CommandSynthesizer;
use crate::engine::policy::{Tool, VariantPolicy};
use crate::engine::progress::ProgressParser;
use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::{ExecutePort, LogPort};
use crate::streams::subtitle_processor::SubtitleDiscovery;

/// Worker request as handed over by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRequest {
    pub file_in: String,
    pub file_out: String,
}

impl WorkerRequest {
    pub fn new(file_in: impl Into<String>, file_out: impl Into<String>) -> Self {
        Self {
            file_in: file_in.into(),
            file_out: file_out.into(),
        }
    }
}

/// Worker response. `exec_command` is empty when the file was rejected, in
/// which case there is no progress parser either.
pub struct WorkerResponse {
    pub exec_command: Vec<String>,
    pub command_progress_parser: Option<Box<dyn ProgressParser>>,
    pub result: TranscodeResult,
}

impl WorkerResponse {
    fn rejected(result: TranscodeResult) -> Self {
        Self {
            exec_command: Vec::new(),
            command_progress_parser: None,
            result,
        }
    }

    pub fn has_command(&self) -> bool {
        !self.exec_command.is_empty()
    }
}

impl fmt::Debug for WorkerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerResponse")
            .field("exec_command", &self.exec_command)
            .field("has_progress_parser", &self.command_progress_parser.is_some())
            .field("result", &self.result)
            .finish()
    }
}

/// Interactor for the worker phase of one variant
pub struct WorkerInteractor {
    policy: VariantPolicy,
    check: CheckInteractor,
    discovery: Option<SubtitleDiscovery>,
    synthesizer: CommandSynthesizer,
    exec_port: Arc<dyn ExecutePort>,
    log_port: Arc<dyn LogPort>,
}

impl WorkerInteractor {
    /// Create new worker interactor. Subtitle discovery is only run when
    /// `discovery` is given.
    pub fn new(
        policy: VariantPolicy,
        check: CheckInteractor,
        discovery: Option<SubtitleDiscovery>,
        synthesizer: CommandSynthesizer,
        exec_port: Arc<dyn ExecutePort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            policy,
            check,
            discovery,
            synthesizer,
            exec_port,
            log_port,
        }
    }

    pub fn policy(&self) -> &VariantPolicy {
        &self.policy
    }

    /// Gate the file and, when accepted, build the command and its progress
    /// parser
    pub fn process(&self, request: &WorkerRequest) -> ReencodeResult<WorkerResponse> {
        let mut job = TranscodeJob::new(MediaFile::new(request.file_in.as_str()), MediaFile::new(request.file_out.as_str()));

        self.check.check_job(&mut job, &self.policy)?;
        if !job.result.status {
            return Ok(WorkerResponse::rejected(job.result));
        }

        let mut length = 0.0;
        if matches!(self.policy.tool, Tool::Ffmpeg) {
            // The gate skips the probe for variants without codec checks
            self.check.populate(&mut job.source)?;
            if let Some(discovery) = &self.discovery {
                discovery.attach(&mut job.source)?;
            }
            length = job.source.length();
        }

        let exec_command = self.synthesizer.build_command(&job, &self.policy)?;
        let parser = self.policy.progress.parser(length, Arc::clone(&self.log_port));

        Ok(WorkerResponse {
            exec_command,
            command_progress_parser: Some(parser),
            result: job.result,
        })
    }

    /// Process the request and run the resulting command to completion.
    /// Returns the gate result; a rejected file is not run.
    pub fn run(&self, request: &WorkerRequest, on_progress: &mut dyn FnMut(u8)) -> ReencodeResult<TranscodeResult> {
        let response = self.process(request)?;
        let WorkerResponse {
            exec_command,
            command_progress_parser,
            result,
        } = response;

        let Some(mut parser) = command_progress_parser else {
            return Ok(result);
        };
        if exec_command.is_empty() {
            return Err(ReencodeError::Execution {
                message: format!("{}: accepted but no command was built", request.file_in),
            });
        }

        self.log_port
            .info(&format!("{}: running {}", request.file_in, exec_command[0]));
        self.exec_port.execute(&exec_command, parser.as_mut(), on_progress)?;
        self.log_port.info(&format!(
            "{}: finished at {}%",
            request.file_in,
            parser.percent()
        ));
        Ok(result)
    }
}
