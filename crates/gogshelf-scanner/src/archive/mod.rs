//! Archive Lister: entry names inside archive containers, without
//! extracting anything.
//!
//! The lister never fails. A missing backend, an unreadable archive or a
//! broken header all produce an empty listing.

#[cfg(feature = "rar")]
mod rar;
mod volume;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use gogshelf_core::errors::ArchiveError;

#[cfg(feature = "rar")]
pub use rar::RarBackend;
pub use volume::{archive_base_name, is_archive, is_first_volume, volume_number};

/// Reads the entry names of one archive file.
///
/// Implementations return the complete listing or an error; a partial
/// listing is never returned.
pub trait ArchiveBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn list(&self, path: &Path) -> Result<Vec<String>, ArchiveError>;
}

/// Capability-gated front end over an [`ArchiveBackend`].
#[derive(Clone)]
pub struct ArchiveLister {
    backend: Option<Arc<dyn ArchiveBackend>>,
}

impl ArchiveLister {
    /// The lister backed by whatever this build supports. Decided once.
    pub fn detect() -> Self {
        #[cfg(feature = "rar")]
        {
            Self::with_backend(Arc::new(RarBackend))
        }
        #[cfg(not(feature = "rar"))]
        {
            tracing::debug!("built without archive support; archived installers are skipped");
            Self::unavailable()
        }
    }

    /// A lister that lists nothing.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Arc<dyn ArchiveBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// All entry names of the archive at `path`; empty on any failure.
    pub fn list_entries(&self, path: &Path) -> Vec<String> {
        match self.try_list(path) {
            Ok(entries) => entries,
            Err(ArchiveError::BackendUnavailable) => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "archive listing failed");
                Vec::new()
            }
        }
    }

    fn try_list(&self, path: &Path) -> Result<Vec<String>, ArchiveError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or(ArchiveError::BackendUnavailable)?;
        let entries = backend.list(path)?;
        tracing::debug!(
            path = %path.display(),
            backend = backend.name(),
            entries = entries.len(),
            "listed archive"
        );
        Ok(entries)
    }
}

impl Default for ArchiveLister {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Debug for ArchiveLister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveLister")
            .field("backend", &self.backend_name())
            .finish()
    }
}

/// Last path segment of an archive entry name, with `\` treated as a
/// separator.
pub fn entry_file_name(entry: &str) -> &str {
    entry
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry)
}
