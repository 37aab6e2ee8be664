//! gogshelf-scanner: the installer catalog core.
//!
//! Discovers GOG installers (`setup_*.exe`) on disk and inside RAR
//! archives, derives a stable key and display name for each one, and
//! diffs the discovered key set against the previous snapshot.
//!
//! Nothing in this crate returns an error for bad input: a missing root,
//! an unreadable archive, or an absent archive backend all degrade to
//! fewer results.

pub mod archive;
pub mod diff;
pub mod discovery;
pub mod identity;
pub mod types;

pub use archive::ArchiveLister;
pub use diff::{diff_keys, KeyDiff};
pub use discovery::{Discoverer, DiscoveryOptions};
pub use types::{ArtifactEntry, ArtifactSet, Container, ContainerKind, DiscoveryStats};
