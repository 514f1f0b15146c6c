//! Snapshot storage adapters.

mod json;

pub use json::JsonSnapshotStore;
