//! Metadata lookup for one catalogued game.

use std::path::Path;

use crate::errors::RemoteError;

/// One lookup request. `product_id`, when set, skips the name search.
#[derive(Debug, Clone, Copy)]
pub struct MetadataRequest<'a> {
    pub key: &'a str,
    pub search_name: &'a str,
    pub product_id: Option<u64>,
    /// Folder receiving `game.json` and downloaded assets.
    pub target_dir: &'a Path,
}

/// What a successful lookup reports back to the scan flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMetadata {
    pub product_id: u64,
    pub title: Option<String>,
}

/// Resolves a game against the remote catalogue and stores what it finds.
///
/// `Ok(None)` means the service answered but nothing matched.
pub trait MetadataFetcher: Send + Sync {
    fn fetch(&self, request: &MetadataRequest<'_>) -> Result<Option<FetchedMetadata>, RemoteError>;
}
