//! Discovery data types: ArtifactEntry, ArtifactSet, DiscoveryStats.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use gogshelf_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};

/// Whether an artifact is a bare file or lives inside an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Standalone,
    Archived,
}

impl ContainerKind {
    /// Path type label used in persisted override records.
    pub fn path_type(&self) -> &'static str {
        match self {
            ContainerKind::Standalone => "file",
            ContainerKind::Archived => "rar",
        }
    }
}

/// Where the installer executable lives. An inner path exists exactly
/// when the artifact is archived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Container {
    Standalone,
    Archived { inner_path: String },
}

/// One discovered installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// Stable identity, `[A-Za-z0-9._-]` only.
    pub key: String,
    /// Absolute path of the executable, or of the archive holding it.
    pub container_path: PathBuf,
    pub container: Container,
    /// Human-oriented name, not unique.
    pub display_name: String,
}

impl ArtifactEntry {
    pub fn container_kind(&self) -> ContainerKind {
        match self.container {
            Container::Standalone => ContainerKind::Standalone,
            Container::Archived { .. } => ContainerKind::Archived,
        }
    }

    /// Entry name inside the archive; `None` for standalone installers.
    pub fn inner_path(&self) -> Option<&str> {
        match &self.container {
            Container::Standalone => None,
            Container::Archived { inner_path } => Some(inner_path),
        }
    }

    pub fn container_path(&self) -> &Path {
        &self.container_path
    }
}

/// Counters collected during one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryStats {
    pub files_walked: usize,
    pub walk_errors: usize,
    pub standalone_found: usize,
    pub archives_seen: usize,
    /// Archives skipped because they are not the first volume of their set.
    pub later_volumes_skipped: usize,
    /// First volumes skipped because their group was already listed.
    pub duplicate_groups_skipped: usize,
    pub archives_listed: usize,
    pub archived_found: usize,
    /// Entries dropped because an earlier entry had the same key.
    pub duplicate_keys: usize,
    pub duration_ms: u64,
}

/// The artifacts found by one discovery pass, unique by key, in
/// discovery order (standalone files first, then archive groups).
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    entries: Vec<ArtifactEntry>,
    index: FxHashMap<String, usize>,
    stats: DiscoveryStats,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; an entry whose key is already present is dropped.
    /// Returns whether the entry was kept.
    pub fn insert(&mut self, entry: ArtifactEntry) -> bool {
        if self.index.contains_key(&entry.key) {
            self.stats.duplicate_keys += 1;
            return false;
        }
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn get(&self, key: &str) -> Option<&ArtifactEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The key set, ready for diffing.
    pub fn keys(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtifactEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &DiscoveryStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut DiscoveryStats {
        &mut self.stats
    }

    /// Entries sorted by key, for stable presentation.
    pub fn sorted_by_key(&self) -> Vec<&ArtifactEntry> {
        let mut sorted: Vec<&ArtifactEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));
        sorted
    }
}

impl IntoIterator for ArtifactSet {
    type Item = ArtifactEntry;
    type IntoIter = std::vec::IntoIter<ArtifactEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
