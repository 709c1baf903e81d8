//! Logging bootstrap and the `Logger` component.
//!
//! `init` wires the process-wide `tracing` subscriber from settings. `Logger`
//! is the audit-trail facade the rest of the workspace logs through: one
//! instance per consumer, constructed with the component name and passed in
//! at build time rather than reached for as a global.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use bookstore_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing pipeline once per process.
///
/// Respects `RUST_LOG` when set; defaults to `info` otherwise.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
    };

    result.map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))
}

/// Structured logging facade scoped to one component.
///
/// Thread-safe and cheap to clone; every repository, module, and controller
/// receives its own instance and tags each line with the component name.
#[derive(Debug, Clone)]
pub struct Logger {
    component: &'static str,
}

impl Logger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        tracing::debug!(component = self.component, "{}", message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        tracing::info!(component = self.component, "{}", message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        tracing::warn!(component = self.component, "{}", message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        tracing::error!(component = self.component, "{}", message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_carries_component_name() {
        let logger = Logger::new("authors");
        assert_eq!(logger.component(), "authors");

        let cloned = logger.clone();
        assert_eq!(cloned.component(), "authors");
    }

    #[test]
    fn log_calls_do_not_panic_without_subscriber() {
        let logger = Logger::new("test");
        logger.debug("debug line");
        logger.info("info line");
        logger.warn("warn line");
        logger.error("error line");
    }
}
