// Inspect interactor - Orchestrates media file inspection use case

use std::sync::Arc;

use serde::Serialize;

use crate::domain::model::MediaFile;
use crate::error::ReencodeResult;
use crate::ports::{FsPort, LogPort, ProbePort};
use crate::probe::Normalizer;
use crate::streams::subtitle_processor::SubtitleDiscovery;

/// Inspect request
#[derive(Debug, Clone, Default)]
pub struct InspectRequest {
    pub input: String,
    /// Also look for loose subtitle files next to the input
    pub discover_subtitles: bool,
}

impl InspectRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            discover_subtitles: false,
        }
    }

    pub fn with_subtitles(mut self, discover: bool) -> Self {
        self.discover_subtitles = discover;
        self
    }
}

/// Inspect response
#[derive(Debug, Clone, Serialize)]
pub struct InspectResponse {
    pub media: MediaFile,
    /// One-line description of every stream, in probe order
    pub summary: String,
}

impl InspectResponse {
    pub fn to_json(&self) -> ReencodeResult<String> {
        Ok(serde_json::to_string_pretty(&self.media)?)
    }
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    log_port: Arc<dyn LogPort>,
    normalizer: Normalizer,
    discovery: SubtitleDiscovery,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, fs_port: Arc<dyn FsPort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            probe_port,
            normalizer: Normalizer::new(Arc::clone(&log_port)),
            discovery: SubtitleDiscovery::new(fs_port, Arc::clone(&log_port)),
            log_port,
        }
    }

    /// Probe, normalize and describe a file
    pub fn execute(&self, request: InspectRequest) -> ReencodeResult<InspectResponse> {
        self.log_port
            .debug(&format!("Starting media file inspection for: {}", request.input));

        let mut media = MediaFile::new(request.input.as_str());
        let raw = self.probe_port.probe(media.name(), media.is_vob())?;
        let vob = media.is_vob();
        self.normalizer.populate(&mut media, &raw, vob)?;
        let info = media.require_info()?;
        self.log_port
            .debug(&format!("{}: {} streams retained", media.name(), info.total_streams()));

        if request.discover_subtitles {
            let attached = self.discovery.attach(&mut media)?;
            self.log_port
                .debug(&format!("{}: {} subtitle file(s) attached", media.name(), attached));
        }

        let summary = media.summary();
        Ok(InspectResponse { media, summary })
    }
}
