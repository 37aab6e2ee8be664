//! Blocking GOG client: search, product details, asset download.

use std::path::Path;
use std::time::Duration;

use gogshelf_core::config::RemoteConfig;
use gogshelf_core::constants::{
    DEFAULT_ASSET_TIMEOUT_SECS, DEFAULT_RETRY_AFTER_SECS, MAX_RATE_LIMIT_RETRIES,
    MAX_RETRY_AFTER_SECS,
};
use gogshelf_core::errors::RemoteError;
use gogshelf_core::traits::{FetchedMetadata, MetadataFetcher, MetadataRequest};

#[cfg(feature = "http")]
use super::assets::{asset_extension, screenshot_urls, video_thumbnails};
#[cfg(feature = "http")]
use super::normalize::{first_search_hit, GameDocument};
#[cfg(feature = "http")]
use gogshelf_core::constants::{GAME_JSON, USER_AGENT};

pub const SEARCH_URL: &str = "https://embed.gog.com/games/ajax/filtered";
pub const PRODUCT_URL: &str = "https://api.gog.com/products";

#[derive(Debug, Clone)]
pub struct GogClientConfig {
    pub search_url: String,
    /// Product endpoint; the product id is appended as a path segment.
    pub product_url: String,
    pub search_timeout: Duration,
    pub product_timeout: Duration,
    pub asset_timeout: Duration,
    /// Pause after each product request.
    pub request_delay: Duration,
    /// Pause after each asset download.
    pub asset_delay: Duration,
    pub download_assets: bool,
    pub screenshot_limit: usize,
    pub video_limit: usize,
    /// How many `429` answers one product request tolerates.
    pub max_rate_limit_retries: u32,
}

impl Default for GogClientConfig {
    fn default() -> Self {
        Self::from_remote(&RemoteConfig::default())
    }
}

impl GogClientConfig {
    pub fn from_remote(remote: &RemoteConfig) -> Self {
        Self {
            search_url: SEARCH_URL.to_string(),
            product_url: PRODUCT_URL.to_string(),
            search_timeout: remote.effective_search_timeout(),
            product_timeout: remote.effective_product_timeout(),
            asset_timeout: Duration::from_secs(DEFAULT_ASSET_TIMEOUT_SECS),
            request_delay: remote.effective_request_delay(),
            asset_delay: remote.effective_asset_delay(),
            download_assets: remote.effective_download_assets(),
            screenshot_limit: remote.effective_screenshot_limit(),
            video_limit: remote.effective_video_limit(),
            max_rate_limit_retries: MAX_RATE_LIMIT_RETRIES,
        }
    }
}

/// Seconds to wait from a `Retry-After` header value; fractional values
/// are accepted, anything unusable means the default wait. The result is
/// capped at [`MAX_RETRY_AFTER_SECS`].
pub fn parse_retry_after(header: Option<&str>) -> Duration {
    header
        .and_then(|v| v.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(Duration::from_secs(DEFAULT_RETRY_AFTER_SECS))
        .min(Duration::from_secs(MAX_RETRY_AFTER_SECS))
}

/// GOG metadata client. Implements [`MetadataFetcher`].
#[derive(Debug, Clone)]
pub struct GogClient {
    config: GogClientConfig,
    #[cfg(feature = "http")]
    http: reqwest::blocking::Client,
}

impl GogClient {
    pub fn new(config: GogClientConfig) -> Result<Self, RemoteError> {
        #[cfg(feature = "http")]
        {
            let http = reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .gzip(true)
                .build()
                .map_err(|e| RemoteError::Http {
                    url: String::new(),
                    message: e.to_string(),
                })?;
            Ok(Self { config, http })
        }

        #[cfg(not(feature = "http"))]
        {
            Ok(Self { config })
        }
    }

    pub fn config(&self) -> &GogClientConfig {
        &self.config
    }
}

#[cfg(feature = "http")]
impl GogClient {
    /// First catalogue hit for `query`; a blank query never matches.
    pub fn search(&self, query: &str) -> Result<Option<super::SearchHit>, RemoteError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let url = &self.config.search_url;
        let response = self
            .http
            .get(url)
            .query(&[("mediaType", "game"), ("search", query), ("limit", "5")])
            .header(reqwest::header::REFERER, "https://www.gog.com/")
            .timeout(self.config.search_timeout)
            .send()
            .map_err(|e| http_err(url, e))?;
        let body = json_body(url, response)?;
        Ok(first_search_hit(&body))
    }

    /// Raw product details. `429` answers are retried after `Retry-After`.
    pub fn product(&self, product_id: u64) -> Result<serde_json::Value, RemoteError> {
        let url = format!("{}/{product_id}", self.config.product_url.trim_end_matches('/'));
        let mut attempts = 0;
        loop {
            let response = self
                .http
                .get(&url)
                .query(&[("locale", "en_US"), ("expand", "screenshots,videos,description")])
                .timeout(self.config.product_timeout)
                .send()
                .map_err(|e| http_err(&url, e))?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                && attempts < self.config.max_rate_limit_retries
            {
                attempts += 1;
                let wait = parse_retry_after(
                    response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok()),
                );
                tracing::warn!(
                    product_id,
                    attempt = attempts,
                    wait_ms = wait.as_millis() as u64,
                    "rate limited by GOG"
                );
                std::thread::sleep(wait);
                continue;
            }
            return json_body(&url, response);
        }
    }

    /// Fetch a product, store `game.json` (and assets) under `target_dir`.
    pub fn fetch_and_save(
        &self,
        product_id: u64,
        target_dir: &Path,
    ) -> Result<GameDocument, RemoteError> {
        let raw = self.product(product_id)?;
        std::thread::sleep(self.config.request_delay);

        let mut game = GameDocument::from_product(&raw);
        std::fs::create_dir_all(target_dir).map_err(|e| io_err(target_dir, e))?;
        if self.config.download_assets {
            game.screenshots_local = self.download_screenshots(&game.screenshots, target_dir);
            game.videos_local = self.download_video_thumbnails(&game.videos, target_dir);
        }

        let path = target_dir.join(GAME_JSON);
        let json = serde_json::to_vec_pretty(&game).map_err(|e| RemoteError::Decode {
            url: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| io_err(&path, e))?;
        tracing::debug!(product_id, path = %path.display(), "saved game metadata");
        Ok(game)
    }

    fn download_screenshots(&self, screenshots: &[serde_json::Value], dir: &Path) -> Vec<String> {
        let mut saved = Vec::new();
        for (i, url) in screenshot_urls(screenshots, self.config.screenshot_limit)
            .iter()
            .enumerate()
        {
            let name = format!("{i:02}{}", asset_extension(url));
            if self.download_asset(url, &dir.join("screenshots").join(&name)) {
                saved.push(format!("screenshots/{name}"));
            }
            std::thread::sleep(self.config.asset_delay);
        }
        saved
    }

    fn download_video_thumbnails(&self, videos: &[serde_json::Value], dir: &Path) -> Vec<String> {
        let mut saved = Vec::new();
        for (url, stem) in video_thumbnails(videos, self.config.video_limit) {
            let name = format!("{stem}{}", asset_extension(&url));
            if self.download_asset(&url, &dir.join("videos").join(&name)) {
                saved.push(format!("videos/{name}"));
            }
            std::thread::sleep(self.config.asset_delay);
        }
        saved
    }

    /// Best effort: failures are logged and reported as `false`.
    fn download_asset(&self, url: &str, dest: &Path) -> bool {
        let result = self
            .http
            .get(url)
            .timeout(self.config.asset_timeout)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes());
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(url, error = %e, "asset download failed");
                return false;
            }
        };
        let written = dest
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(dest, &bytes));
        if let Err(e) = written {
            tracing::warn!(path = %dest.display(), error = %e, "could not store asset");
            return false;
        }
        true
    }
}

impl MetadataFetcher for GogClient {
    fn fetch(&self, request: &MetadataRequest<'_>) -> Result<Option<FetchedMetadata>, RemoteError> {
        #[cfg(feature = "http")]
        {
            let product_id = match request.product_id {
                Some(id) => id,
                None => match self.search(request.search_name)? {
                    Some(hit) => hit.id,
                    None => {
                        tracing::debug!(key = request.key, search = request.search_name, "no GOG match");
                        return Ok(None);
                    }
                },
            };
            let game = self.fetch_and_save(product_id, request.target_dir)?;
            Ok(Some(FetchedMetadata {
                product_id,
                title: game.title,
            }))
        }

        #[cfg(not(feature = "http"))]
        {
            let _ = request;
            Err(RemoteError::FeatureDisabled)
        }
    }
}

#[cfg(feature = "http")]
fn json_body(
    url: &str,
    response: reqwest::blocking::Response,
) -> Result<serde_json::Value, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.json().map_err(|e| RemoteError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(feature = "http")]
fn http_err(url: &str, e: reqwest::Error) -> RemoteError {
    RemoteError::Http {
        url: url.to_string(),
        message: e.to_string(),
    }
}

#[cfg(feature = "http")]
fn io_err(path: &Path, source: std::io::Error) -> RemoteError {
    RemoteError::Io {
        path: path.to_path_buf(),
        source,
    }
}
