//! Snapshot store port.
//!
//! A snapshot is the machine-readable audit record of one cycle. Stores are
//! append-only: saving never replaces an earlier snapshot.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AggregateReport;
use crate::error::Result;

/// File-name prefix shared by every snapshot.
pub const SNAPSHOT_PREFIX: &str = "crypto_data_";

/// Serializable record of one cycle's aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken; also encoded in its name.
    pub taken_at: DateTime<Utc>,
    /// The full report for the cycle.
    pub report: AggregateReport,
}

impl Snapshot {
    #[must_use]
    pub fn new(report: AggregateReport) -> Self {
        Self {
            taken_at: report.generated_at(),
            report,
        }
    }

    /// Storage name keyed by the cycle timestamp,
    /// e.g. `crypto_data_20240101_070000.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.json",
            SNAPSHOT_PREFIX,
            self.taken_at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Durable storage for cycle snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot and return where it was written.
    fn save(&self, snapshot: &Snapshot) -> Result<PathBuf>;

    /// Load the most recent snapshot, if any exist.
    fn latest(&self) -> Result<Option<(PathBuf, Snapshot)>>;
}
