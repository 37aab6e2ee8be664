//! gogshelf-storage: everything gogshelf keeps under the metadata root.
//!
//! ```text
//! <metadata_root>/
//!   _scan_state.json          snapshot of the last scan's keys
//!   <key>/override.json       user overrides + cached installer info
//!   <key>/game.json           normalized remote metadata
//!   <key>/screenshots/, videos/
//! ```
//!
//! Reads are forgiving: a missing or malformed file loads as "absent".
//! Writes go through a temporary file and a rename.

pub mod catalog;
pub mod json;
pub mod layout;
pub mod overrides;
pub mod snapshot;

pub use catalog::{Catalog, CatalogRecord, InstallerInfo};
pub use layout::MetadataLayout;
pub use overrides::{Override, OverrideStore};
pub use snapshot::{Snapshot, SnapshotStore};
