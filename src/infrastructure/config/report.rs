//! Report and snapshot configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::application::reporter::DEFAULT_DISPLAY_LIMIT;
use crate::domain::DEFAULT_RANK_LIMIT;

/// Ranking, display, and snapshot settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Gainers and losers kept per exchange.
    #[serde(default = "default_gainer_limit")]
    pub gainer_limit: usize,
    /// Entries shown per list in rendered text.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    /// Directory for `crypto_data_*.json` snapshots.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

const fn default_gainer_limit() -> usize {
    DEFAULT_RANK_LIMIT
}

const fn default_display_limit() -> usize {
    DEFAULT_DISPLAY_LIMIT
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            gainer_limit: default_gainer_limit(),
            display_limit: default_display_limit(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}
