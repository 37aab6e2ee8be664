//! Discovery Engine: walks the installer root and produces the current
//! artifact set.
//!
//! Standalone installers are collected first, then archives. Each logical
//! archive (all volumes of a split set) is listed at most once per pass.

mod walker;

use std::path::{Path, PathBuf};
use std::time::Instant;

use gogshelf_core::config::ScanConfig;
use gogshelf_core::types::collections::FxHashSet;
use rayon::prelude::*;

use crate::archive::{archive_base_name, entry_file_name, is_archive, is_first_volume, ArchiveLister};
use crate::identity::{derive_display_name, derive_key, is_installer_name, relative_key_path};
use crate::types::{ArtifactEntry, ArtifactSet, Container};

/// Discovery knobs, usually taken from `[scan]` in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub follow_symlinks: bool,
    /// Look inside archives at all.
    pub archives: bool,
    /// Archive listing threads. 0 = rayon default.
    pub threads: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            archives: true,
            threads: 0,
        }
    }
}

impl DiscoveryOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            follow_symlinks: config.effective_follow_symlinks(),
            archives: config.effective_archives(),
            threads: config.effective_threads(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Discoverer {
    options: DiscoveryOptions,
    lister: ArchiveLister,
}

impl Discoverer {
    pub fn new(options: DiscoveryOptions, lister: ArchiveLister) -> Self {
        Self { options, lister }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    pub fn lister(&self) -> &ArchiveLister {
        &self.lister
    }

    /// Discover every installer under `root`. A missing or non-directory
    /// root yields an empty set.
    pub fn discover(&self, root: &Path) -> ArtifactSet {
        let start = Instant::now();
        let mut set = ArtifactSet::new();

        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "installer root is not a directory");
            return set;
        }
        let root = absolute_root(root);

        let files = walker::collect_files(&root, self.options.follow_symlinks, set.stats_mut());

        for entry in standalone_entries(&root, &files) {
            set.stats_mut().standalone_found += 1;
            set.insert(entry);
        }

        if self.options.archives && self.lister.is_available() {
            let selected = select_archives(&files, &mut set);
            let listed = self.list_archives(&root, &selected);
            set.stats_mut().archives_listed = selected.len();
            for entry in listed.into_iter().flatten() {
                set.stats_mut().archived_found += 1;
                set.insert(entry);
            }
        } else {
            tracing::debug!(
                enabled = self.options.archives,
                available = self.lister.is_available(),
                "archive pass skipped"
            );
        }

        set.stats_mut().duration_ms = start.elapsed().as_millis() as u64;
        let stats = set.stats();
        tracing::info!(
            root = %root.display(),
            artifacts = set.len(),
            files = stats.files_walked,
            archives = stats.archives_listed,
            duplicates = stats.duplicate_keys,
            duration_ms = stats.duration_ms,
            "discovery complete"
        );
        set
    }

    /// List the selected archives, one task per archive group. Results come
    /// back in the order of `selected`.
    fn list_archives(&self, root: &Path, selected: &[PathBuf]) -> Vec<Vec<ArtifactEntry>> {
        let list = || -> Vec<Vec<ArtifactEntry>> {
            selected
                .par_iter()
                .map(|path| archived_entries(root, path, &self.lister.list_entries(path)))
                .collect()
        };

        if self.options.threads == 0 {
            return list();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()
        {
            Ok(pool) => pool.install(list),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to the global thread pool");
                list()
            }
        }
    }
}

impl Default for Discoverer {
    fn default() -> Self {
        Self::new(DiscoveryOptions::default(), ArchiveLister::detect())
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    root.canonicalize()
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

fn standalone_entries<'a>(
    root: &'a Path,
    files: &'a [PathBuf],
) -> impl Iterator<Item = ArtifactEntry> + 'a {
    files.iter().filter_map(move |path| {
        let name = path.file_name()?.to_str()?;
        if !is_installer_name(name) {
            return None;
        }
        let rel = relative_key_path(root, path)?;
        Some(ArtifactEntry {
            key: derive_key(&rel, None),
            container_path: path.clone(),
            container: Container::Standalone,
            display_name: derive_display_name(path, None),
        })
    })
}

/// First volumes whose base name was not yet seen in this pass, in walk order.
///
/// The base name alone is the key, so an archive name that repeats in two
/// folders is listed only from the first folder walked.
fn select_archives(files: &[PathBuf], set: &mut ArtifactSet) -> Vec<PathBuf> {
    let mut seen_bases: FxHashSet<String> = FxHashSet::default();
    let mut selected = Vec::new();
    for path in files.iter().filter(|p| is_archive(p)) {
        let stats = set.stats_mut();
        stats.archives_seen += 1;
        if !is_first_volume(path) {
            tracing::debug!(path = %path.display(), "skipping later volume");
            stats.later_volumes_skipped += 1;
            continue;
        }
        if !seen_bases.insert(archive_base_name(path)) {
            tracing::debug!(path = %path.display(), "archive base name already selected");
            stats.duplicate_groups_skipped += 1;
            continue;
        }
        selected.push(path.clone());
    }
    selected
}

fn archived_entries(root: &Path, archive: &Path, names: &[String]) -> Vec<ArtifactEntry> {
    let Some(rel) = relative_key_path(root, archive) else {
        return Vec::new();
    };
    names
        .iter()
        .filter(|name| is_installer_name(entry_file_name(name)))
        .map(|name| ArtifactEntry {
            key: derive_key(&rel, Some(name)),
            container_path: archive.to_path_buf(),
            container: Container::Archived {
                inner_path: name.clone(),
            },
            display_name: derive_display_name(archive, Some(name)),
        })
        .collect()
}
