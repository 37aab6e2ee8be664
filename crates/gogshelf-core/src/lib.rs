//! gogshelf-core: shared foundation for the installer catalog.
//!
//! - config: TOML config with layered resolution
//! - errors: one `thiserror` enum per subsystem
//! - events: notification sink trait and dispatcher
//! - traits: collaborator seams (metadata fetch)
//! - tracing: subscriber setup
//! - constants, types: defaults and shared collections

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::ShelfConfig;
pub use errors::ShelfErrorCode;
pub use events::{EventDispatcher, ShelfEventHandler};
