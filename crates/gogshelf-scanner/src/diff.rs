//! Snapshot Differ: key-set comparison between two scans.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Keys that appeared and disappeared since the previous snapshot.
///
/// Both sets iterate in key order, so callers can consume them one key
/// at a time with a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl KeyDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// `added = current - previous`, `removed = previous - current`.
pub fn diff_keys(current: &BTreeSet<String>, previous: &BTreeSet<String>) -> KeyDiff {
    KeyDiff {
        added: current.difference(previous).cloned().collect(),
        removed: previous.difference(current).cloned().collect(),
    }
}
