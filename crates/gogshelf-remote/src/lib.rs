//! gogshelf-remote: the network-facing collaborators of a scan.
//!
//! - [`GogClient`] resolves a game name or product id against GOG's public
//!   catalogue, writes `game.json` and optionally downloads screenshots and
//!   video thumbnails. It implements `MetadataFetcher`.
//! - [`DiscordNotifier`] turns scan events into Discord webhook posts. It
//!   implements `ShelfEventHandler` and never blocks the scan.
//!
//! All HTTP goes through `reqwest`'s blocking client behind the `http`
//! feature.

pub mod discord;
pub mod gog;

pub use discord::DiscordNotifier;
pub use gog::{GameDocument, GogClient, GogClientConfig};
