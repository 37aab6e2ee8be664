//! Remote metadata service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ASSET_DELAY_MS, DEFAULT_FETCH_DELAY_MS, DEFAULT_PRODUCT_TIMEOUT_SECS,
    DEFAULT_REQUEST_DELAY_MS, DEFAULT_SCREENSHOT_LIMIT, DEFAULT_SEARCH_TIMEOUT_SECS,
    DEFAULT_VIDEO_LIMIT,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    /// Pause between two metadata fetches of one scan, in milliseconds.
    pub fetch_delay_ms: Option<u64>,
    /// Pause after each product request, in milliseconds.
    pub request_delay_ms: Option<u64>,
    /// Pause between asset downloads, in milliseconds.
    pub asset_delay_ms: Option<u64>,
    pub search_timeout_secs: Option<u64>,
    pub product_timeout_secs: Option<u64>,
    /// Download screenshots and video thumbnails. Default: true.
    pub download_assets: Option<bool>,
    pub screenshot_limit: Option<usize>,
    pub video_limit: Option<usize>,
}

impl RemoteConfig {
    pub fn effective_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms.unwrap_or(DEFAULT_FETCH_DELAY_MS))
    }

    pub fn effective_request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms.unwrap_or(DEFAULT_REQUEST_DELAY_MS))
    }

    pub fn effective_asset_delay(&self) -> Duration {
        Duration::from_millis(self.asset_delay_ms.unwrap_or(DEFAULT_ASSET_DELAY_MS))
    }

    pub fn effective_search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs.unwrap_or(DEFAULT_SEARCH_TIMEOUT_SECS))
    }

    pub fn effective_product_timeout(&self) -> Duration {
        Duration::from_secs(
            self.product_timeout_secs
                .unwrap_or(DEFAULT_PRODUCT_TIMEOUT_SECS),
        )
    }

    pub fn effective_download_assets(&self) -> bool {
        self.download_assets.unwrap_or(true)
    }

    pub fn effective_screenshot_limit(&self) -> usize {
        self.screenshot_limit.unwrap_or(DEFAULT_SCREENSHOT_LIMIT)
    }

    pub fn effective_video_limit(&self) -> usize {
        self.video_limit.unwrap_or(DEFAULT_VIDEO_LIMIT)
    }
}
