//! The persisted key set of the last completed scan.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use gogshelf_core::errors::StorageError;
use serde::{Deserialize, Serialize};

use crate::json::{read_json, write_json_atomic};
use crate::layout::MetadataLayout;

/// On-disk shape of `_scan_state.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "installer_keys", default)]
    pub known_keys: BTreeSet<String>,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub last_scan: Option<f64>,
}

impl Snapshot {
    pub fn new(known_keys: BTreeSet<String>, at: DateTime<Utc>) -> Self {
        Self {
            known_keys,
            last_scan: Some(at.timestamp_millis() as f64 / 1000.0),
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = self.last_scan.filter(|s| s.is_finite())?;
        DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
    }

    pub fn is_empty(&self) -> bool {
        self.known_keys.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(layout: &MetadataLayout) -> Self {
        Self {
            path: layout.snapshot_path(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// The previous snapshot; empty when absent or unreadable.
    pub fn load(&self) -> Snapshot {
        match read_json::<Snapshot>(&self.path) {
            Some(snapshot) => {
                tracing::debug!(keys = snapshot.known_keys.len(), "loaded scan snapshot");
                snapshot
            }
            None => Snapshot::default(),
        }
    }

    pub fn save(&self, keys: &BTreeSet<String>, at: DateTime<Utc>) -> Result<(), StorageError> {
        write_json_atomic(&self.path, &Snapshot::new(keys.clone(), at))?;
        tracing::debug!(keys = keys.len(), path = %self.path.display(), "saved scan snapshot");
        Ok(())
    }
}
