//! RAR listing through the `unrar` library.

use std::path::Path;

use gogshelf_core::errors::ArchiveError;
use gogshelf_core::types::collections::FxHashSet;

use super::ArchiveBackend;

/// Lists RAR archives, following multi-volume sets from the first volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct RarBackend;

impl ArchiveBackend for RarBackend {
    fn name(&self) -> &'static str {
        "rar"
    }

    fn list(&self, path: &Path) -> Result<Vec<String>, ArchiveError> {
        let archive = unrar::Archive::new(path)
            .open_for_listing()
            .map_err(|e| ArchiveError::Open {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        // A file split across volumes has one header per volume.
        let mut seen = FxHashSet::default();
        let mut names = Vec::new();
        for header in archive {
            let header = header.map_err(|e| ArchiveError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            let name = header.filename.to_string_lossy().into_owned();
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
        Ok(names)
    }
}
