//! Discovery configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SCAN_THREADS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Look inside archives. Default: true (when an archive backend is compiled in).
    pub archives: Option<bool>,
    /// Follow symlinked directories during the walk. Default: false.
    pub follow_symlinks: Option<bool>,
    /// Threads used for archive listing. 0 = rayon default.
    pub threads: Option<usize>,
}

impl ScanConfig {
    pub fn effective_archives(&self) -> bool {
        self.archives.unwrap_or(true)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_SCAN_THREADS)
    }
}
