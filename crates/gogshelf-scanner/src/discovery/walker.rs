//! Sorted recursive walk over the installer root.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::types::DiscoveryStats;

/// Every regular file under `root`, in a stable order (sorted by file name
/// within each directory). Unreadable entries are skipped and counted.
pub(crate) fn collect_files(
    root: &Path,
    follow_symlinks: bool,
    stats: &mut DiscoveryStats,
) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(follow_symlinks)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                stats.walk_errors += 1;
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() {
            files.push(path.to_path_buf());
        }
    }
    stats.files_walked = files.len();
    files
}
