//! Filesystem roots.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where installers live and where metadata is written.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Root directory holding installers (standalone or in archives).
    pub installer_root: Option<PathBuf>,
    /// Root directory for snapshot, overrides, and fetched metadata.
    pub metadata_root: Option<PathBuf>,
}
