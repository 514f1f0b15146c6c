//! Logging configuration and initialization.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
    /// Also append plain-text log lines to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Calling this
    /// more than once keeps the first subscriber.
    ///
    /// When a log file is configured the returned guard owns its background
    /// writer; keep it alive until the command finishes or buffered lines
    /// are lost.
    #[allow(clippy::result_large_err)]
    pub fn init(&self) -> Result<Option<WorkerGuard>> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let (file_layer, guard) = match &self.file {
            Some(path) => {
                let appender = file_appender(path)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let json = self.format == "json";
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(json.then(|| fmt::layer().json()))
            .with((!json).then(|| fmt::layer()))
            .with(file_layer)
            .try_init();
        if installed.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
        Ok(guard)
    }

    /// Same configuration with a different level directive.
    #[must_use]
    pub fn with_level(&self, level: &str) -> Self {
        Self {
            level: level.to_string(),
            ..self.clone()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            file: None,
        }
    }
}

/// Directory and file name of a log path. A bare file name lives in the
/// working directory.
pub(crate) fn split_log_path(path: &Path) -> Option<(&Path, &OsStr)> {
    let name = path.file_name()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some((dir, name))
}

/// Append-only appender that never rotates.
#[allow(clippy::result_large_err)]
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: "logging.file",
        reason,
    };
    let (dir, name) =
        split_log_path(path).ok_or_else(|| invalid("must name a file".to_string()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| invalid(e.to_string()))?;
    Ok(appender)
}
