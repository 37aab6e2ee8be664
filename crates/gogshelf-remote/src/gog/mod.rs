//! GOG catalogue client.

mod assets;
mod client;
mod normalize;

pub use assets::{asset_extension, ensure_https, safe_filename, screenshot_urls, video_thumbnails};
pub use client::{parse_retry_after, GogClient, GogClientConfig};
pub use normalize::{first_search_hit, GameDocument, GameImages, GameLinks, SearchHit};
