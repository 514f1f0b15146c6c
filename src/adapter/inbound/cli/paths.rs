//! Path utilities for moverwatch.
//!
//! Configuration lives under `~/.moverwatch/`:
//! - `~/.moverwatch/config.toml` - main configuration
//!
//! Snapshots default to `./data`, matching `[report].snapshot_dir`.

use std::path::PathBuf;

use crate::infrastructure::config::report::ReportConfig;

/// Returns the moverwatch home directory (`~/.moverwatch/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".moverwatch")
}

/// Returns the default config file path (`~/.moverwatch/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default snapshot directory.
pub fn default_snapshot_dir() -> PathBuf {
    ReportConfig::default().snapshot_dir
}
