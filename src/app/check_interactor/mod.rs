// Check interactor - Acceptance gate run before a file is queued

use std::sync::Arc;

use crate::domain::model::{MediaFile, Stream, TranscodeJob, TranscodeResult};
use crate::engine::policy::VariantPolicy;
use crate::error::{ReencodeError, ReencodeResult};
use crate::ports::{FsPort, LogPort, ProbePort};
use crate::probe::Normalizer;
use crate::utils::path::PathUtils;

/// Decides whether a file should be re-encoded under a variant
pub struct CheckInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    normalizer: Normalizer,
}

impl CheckInteractor {
    /// Create new check interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, fs_port: Arc<dyn FsPort>, log_port: Arc<dyn LogPort>) -> Self {
        let normalizer = Normalizer::new(Arc::clone(&log_port));
        Self {
            probe_port,
            fs_port,
            log_port,
            normalizer,
        }
    }

    /// Accept or reject `source`, with the reason
    pub fn should_process(&self, source: &str, destination: &str, policy: &VariantPolicy) -> ReencodeResult<TranscodeResult> {
        let mut job = TranscodeJob::new(MediaFile::new(source), MediaFile::new(destination));
        self.check_job(&mut job, policy)?;
        Ok(job.result)
    }

    /// Run the gate on a job, recording the outcome in `job.result`. Cheap
    /// filename checks come first; the probe only runs when they pass and the
    /// variant has codec checks. File-level probe failures become rejections;
    /// only contract violations are returned as errors.
    pub fn check_job(&self, job: &mut TranscodeJob, policy: &VariantPolicy) -> ReencodeResult<()> {
        let source = job.source.name().to_string();

        if let Some(marker) = PathUtils::new().name_contains_any(&source, policy.skip_name_markers) {
            return self.reject(job, format!("{}: file name marks it as {}", source, marker));
        }

        let destination = job.destination.name().to_string();
        if self.fs_port.file_exists(&destination) {
            return self.reject(job, format!("{}: output {} already exists", source, destination));
        }

        if policy.needs_probe() {
            if let Err(err) = self.populate(&mut job.source) {
                if !err.is_recoverable() {
                    return Err(err);
                }
                let reason = format!("{}: {}", source, err);
                match err {
                    ReencodeError::NoUsableStreams { .. } => self.log_port.info(&reason),
                    _ => self.log_port.warn(&reason),
                }
                job.result = TranscodeResult::reject(reason);
                return Ok(());
            }

            if let Some(reason) = Self::codec_rejection(&job.source, policy) {
                return self.reject(job, format!("{}: {}", source, reason));
            }
        }

        job.result = TranscodeResult::accept(format!("{}: ready for {}", source, policy.variant));
        self.log_port.info(&job.result.message);
        Ok(())
    }

    /// Probe and normalize `media` unless that already happened
    pub fn populate(&self, media: &mut MediaFile) -> ReencodeResult<()> {
        if media.is_populated() {
            return Ok(());
        }
        let raw = self.probe_port.probe(media.name(), media.is_vob())?;
        let vob = media.is_vob();
        self.normalizer.populate(media, &raw, vob)?;
        if let Ok(size) = self.fs_port.file_size(media.name()) {
            if size != media.size() {
                self.log_port.debug(&format!(
                    "{}: probe reports {} bytes, filesystem {}",
                    media.name(),
                    media.size(),
                    size
                ));
            }
        }
        Ok(())
    }

    fn codec_rejection(media: &MediaFile, policy: &VariantPolicy) -> Option<String> {
        let video = media
            .video_streams()
            .iter()
            .find(|s| policy.reject_video_codecs.iter().any(|c| *c == s.codec()))
            .map(|s| format!("video stream {} is already {}", s.index(), s.codec()));

        video.or_else(|| {
            media
                .audio_streams()
                .iter()
                .find(|s| policy.reject_audio_codecs.iter().any(|c| *c == s.codec()))
                .map(|s| format!("audio stream {} is already {}", s.index(), s.codec()))
        })
    }

    fn reject(&self, job: &mut TranscodeJob, reason: String) -> ReencodeResult<()> {
        self.log_port.info(&reason);
        job.result = TranscodeResult::reject(reason);
        Ok(())
    }
}
