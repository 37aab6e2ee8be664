//! Collaborator traits: the seams between the scan flow and the outside world.

pub mod metadata;

pub use metadata::{FetchedMetadata, MetadataFetcher, MetadataRequest};
