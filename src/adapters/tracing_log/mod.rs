// Tracing log adapter - LogPort on top of the tracing macros

use tracing::{debug, error, info, warn};

use crate::ports::LogPort;

/// Forwards core-component log lines to `tracing`, tagged with the variant
#[derive(Debug, Clone)]
pub struct TracingLogAdapter {
    plugin: String,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter for one plugin variant
    pub fn new(plugin: impl Into<String>) -> Self {
        Self { plugin: plugin.into() }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }
}

impl LogPort for TracingLogAdapter {
    fn info(&self, message: &str) {
        info!(plugin = %self.plugin, "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(plugin = %self.plugin, "{}", message);
    }

    fn error(&self, message: &str) {
        error!(plugin = %self.plugin, "{}", message);
    }

    fn debug(&self, message: &str) {
        debug!(plugin = %self.plugin, "{}", message);
    }
}
