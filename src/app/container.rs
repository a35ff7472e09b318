use std::path::Path;
use std::sync::Arc;

use crate::adapters::{
    AppConfig, FfprobeAdapter, FixtureProbeAdapter, FsLocalAdapter, ProcessExecAdapter, TracingLogAdapter,
};
use crate::app::{
    check_interactor::CheckInteractor, inspect_interactor::InspectInteractor,
    worker_interactor::WorkerInteractor,
};
use crate::engine::command::{CommandSynthesizer, ToolPaths};
use crate::engine::policy::Variant;
use crate::ports::{ExecutePort, FsPort, LogPort, ProbePort};
use crate::streams::subtitle_processor::SubtitleDiscovery;

pub trait AppContainer: Send + Sync {
    fn check_interactor(&self) -> Arc<CheckInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn worker_interactor(&self) -> Arc<WorkerInteractor>;
    fn log_port(&self) -> Arc<dyn LogPort>;
}

/// The set of port implementations the interactors are wired with
#[derive(Clone)]
pub struct Ports {
    pub probe: Arc<dyn ProbePort>,
    pub execute: Arc<dyn ExecutePort>,
    pub fs: Arc<dyn FsPort>,
    pub log: Arc<dyn LogPort>,
}

impl Ports {
    /// Production ports. With `probe_report` set, probe output is read from
    /// that JSON file instead of running ffprobe.
    pub fn from_config(config: &AppConfig, variant: Variant, probe_report: Option<&Path>) -> Self {
        let probe: Arc<dyn ProbePort> = match probe_report {
            Some(path) => Arc::new(FixtureProbeAdapter::new(path)),
            None => Arc::new(FfprobeAdapter::new(config.ffprobe_path.as_str())),
        };
        Self {
            probe,
            execute: Arc::new(ProcessExecAdapter::new()),
            fs: Arc::new(FsLocalAdapter::new()),
            log: Arc::new(TracingLogAdapter::new(variant.as_str())),
        }
    }
}

pub struct DefaultAppContainer {
    check_interactor: Arc<CheckInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    worker_interactor: Arc<WorkerInteractor>,
    log_port: Arc<dyn LogPort>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig, variant: Variant, probe_report: Option<&Path>) -> Self {
        Self::with_ports(config, variant, Ports::from_config(config, variant, probe_report))
    }

    pub fn with_ports(config: &AppConfig, variant: Variant, ports: Ports) -> Self {
        let check = || CheckInteractor::new(Arc::clone(&ports.probe), Arc::clone(&ports.fs), Arc::clone(&ports.log));

        let discovery = config
            .discover_subtitles
            .then(|| SubtitleDiscovery::new(Arc::clone(&ports.fs), Arc::clone(&ports.log)));

        let tools = ToolPaths {
            ffmpeg: config.ffmpeg_path.clone(),
            ffmpeg_normalize: config.ffmpeg_normalize_path.clone(),
        };

        let worker_interactor = Arc::new(WorkerInteractor::new(
            variant.policy(),
            check(),
            discovery,
            CommandSynthesizer::new(tools, Arc::clone(&ports.log)),
            Arc::clone(&ports.execute),
            Arc::clone(&ports.log),
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&ports.probe),
            Arc::clone(&ports.fs),
            Arc::clone(&ports.log),
        ));

        Self {
            check_interactor: Arc::new(check()),
            inspect_interactor,
            worker_interactor,
            log_port: Arc::clone(&ports.log),
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn check_interactor(&self) -> Arc<CheckInteractor> {
        Arc::clone(&self.check_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn worker_interactor(&self) -> Arc<WorkerInteractor> {
        Arc::clone(&self.worker_interactor)
    }

    fn log_port(&self) -> Arc<dyn LogPort> {
        Arc::clone(&self.log_port)
    }
}
