//! Pretty-JSON snapshot files in a directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::port::outbound::snapshot::SNAPSHOT_PREFIX;
use crate::port::{Snapshot, SnapshotStore};

/// Highest numeric suffix tried before giving up on a name.
const MAX_SUFFIX: u32 = 1000;

/// Length of the `YYYYMMDD_HHMMSS` part of a snapshot name.
const TIMESTAMP_LEN: usize = 15;

/// Stores snapshots as `crypto_data_YYYYMMDD_HHMMSS.json` files.
///
/// Files are never overwritten: when a name is taken, `_1`, `_2`, ... is
/// appended before the extension.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot files in the directory, oldest first.
    ///
    /// A missing directory has no snapshots.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if is_snapshot_file(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| order_key(a).cmp(&order_key(b)).then_with(|| a.cmp(b)));
        Ok(files)
    }

    /// Read one snapshot file.
    pub fn load(path: &Path) -> Result<Snapshot> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Create the first free file for `name`, never replacing an existing one.
    fn create_unique(&self, name: &str) -> Result<(PathBuf, fs::File)> {
        let (stem, ext) = name.rsplit_once('.').unwrap_or((name, "json"));
        for attempt in 0..=MAX_SUFFIX {
            let candidate = if attempt == 0 {
                self.dir.join(name)
            } else {
                self.dir.join(format!("{stem}_{attempt}.{ext}"))
            };
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(Error::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free snapshot name for {name}"),
        )))
    }
}

/// Chronological sort key: the embedded timestamp, then the numeric
/// collision suffix, so `_10` sorts after `_9`.
fn order_key(path: &Path) -> (&str, u32) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stamp = stem.strip_prefix(SNAPSHOT_PREFIX).unwrap_or(stem);
    let Some(timestamp) = stamp.get(..TIMESTAMP_LEN) else {
        return (stamp, 0);
    };
    let suffix = stamp
        .get(TIMESTAMP_LEN..)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    (timestamp, suffix)
}

fn is_snapshot_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SNAPSHOT_PREFIX))
}

impl SnapshotStore for JsonSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::create_dir_all(&self.dir)?;

        let (path, mut file) = self.create_unique(&snapshot.file_name())?;
        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&path);
            Error::Io(e)
        };
        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;

        debug!(path = %path.display(), bytes = json.len(), "Snapshot written");
        Ok(path)
    }

    fn latest(&self) -> Result<Option<(PathBuf, Snapshot)>> {
        match self.list()?.pop() {
            Some(path) => {
                let snapshot = Self::load(&path)?;
                Ok(Some((path, snapshot)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregateReport, ExchangeId, ExchangeResult};
    use chrono::{TimeZone, Utc};

    fn snapshot(hour: u32) -> Snapshot {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap();
        Snapshot::new(AggregateReport::new(
            at,
            vec![ExchangeResult::failure(ExchangeId::Bybit, "down", at)],
        ))
    }

    #[test]
    fn save_writes_pretty_json_named_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("data"));

        let path = store.save(&snapshot(7)).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "crypto_data_20240601_070000.json"
        );
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        assert_eq!(JsonSnapshotStore::load(&path).unwrap(), snapshot(7));
    }

    #[test]
    fn save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path());

        let first = store.save(&snapshot(7)).unwrap();
        let second = store.save(&snapshot(7)).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap().to_str().unwrap(),
            "crypto_data_20240601_070000_1.json"
        );
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn latest_picks_newest_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path());
        store.save(&snapshot(9)).unwrap();
        store.save(&snapshot(7)).unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let (path, latest) = store.latest().unwrap().unwrap();

        assert!(path.ends_with("crypto_data_20240601_090000.json"));
        assert_eq!(latest, snapshot(9));
    }

    #[test]
    fn latest_orders_collision_suffixes_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path());
        store.save(&snapshot(6)).unwrap();

        let mut last = PathBuf::new();
        for _ in 0..11 {
            last = store.save(&snapshot(7)).unwrap();
        }
        assert!(last.ends_with("crypto_data_20240601_070000_10.json"));

        let (path, _) = store.latest().unwrap().unwrap();
        assert_eq!(path, last);

        let names: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names[0], "crypto_data_20240601_060000.json");
        assert_eq!(names[1], "crypto_data_20240601_070000.json");
        assert_eq!(names[2], "crypto_data_20240601_070000_1.json");
        assert_eq!(names[10], "crypto_data_20240601_070000_9.json");
        assert_eq!(names[11], "crypto_data_20240601_070000_10.json");
    }

    #[test]
    fn missing_directory_has_no_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("absent"));

        assert!(store.list().unwrap().is_empty());
        assert!(store.latest().unwrap().is_none());
    }
}
