//! Top-level gogshelf configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{NotifyConfig, PathsConfig, RemoteConfig, ScanConfig, ScheduleConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

pub const ENV_INSTALLER_PATH: &str = "GOG_INSTALLER_PATH";
pub const ENV_METADATA_PATH: &str = "GOG_METADATA_PATH";
pub const ENV_SCAN_SCHEDULE: &str = "GOG_SCAN_SCHEDULE";
pub const ENV_DISCORD_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const ENV_SCAN_THREADS: &str = "GOGSHELF_SCAN_THREADS";
pub const ENV_FETCH_DELAY_MS: &str = "GOGSHELF_FETCH_DELAY_MS";
pub const ENV_ARCHIVES: &str = "GOGSHELF_ARCHIVES";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GOG_*`, `DISCORD_WEBHOOK_URL`, `GOGSHELF_*`)
/// 3. Project config (`gogshelf.toml` in the project dir, or `--config`)
/// 4. User config (`~/.gogshelf/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShelfConfig {
    pub paths: PathsConfig,
    pub scan: ScanConfig,
    pub remote: RemoteConfig,
    pub notify: NotifyConfig,
    pub schedule: ScheduleConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file; replaces the project-level lookup and must exist.
    pub config_file: Option<PathBuf>,
    pub installer_root: Option<PathBuf>,
    pub metadata_root: Option<PathBuf>,
}

impl ShelfConfig {
    /// Load configuration with layered resolution.
    pub fn load(project_dir: &Path, cli: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config, or the explicit --config file
        match cli.and_then(|c| c.config_file.as_deref()) {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, explicit)?;
            }
            None => {
                let project_config_path = project_dir.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ShelfConfig) -> Result<(), ConfigError> {
        if config.remote.search_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "remote.search_timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.remote.product_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "remote.product_timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(url) = config.notify.discord_webhook_url.as_deref() {
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationFailed {
                    field: "notify.discord_webhook_url".to_string(),
                    message: "must be an http(s) URL".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Installer root, required by every command that discovers installers.
    pub fn require_installer_root(&self) -> Result<PathBuf, ConfigError> {
        self.paths
            .installer_root
            .clone()
            .ok_or_else(|| ConfigError::MissingValue {
                field: "paths.installer_root".to_string(),
                env_var: ENV_INSTALLER_PATH.to_string(),
            })
    }

    /// Metadata root, required by every command that reads or writes state.
    pub fn require_metadata_root(&self) -> Result<PathBuf, ConfigError> {
        self.paths
            .metadata_root
            .clone()
            .ok_or_else(|| ConfigError::MissingValue {
                field: "paths.metadata_root".to_string(),
                env_var: ENV_METADATA_PATH.to_string(),
            })
    }

    /// Returns the user config path: `~/.gogshelf/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".gogshelf").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut ShelfConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ShelfConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut ShelfConfig, other: &ShelfConfig) {
        // Paths
        if other.paths.installer_root.is_some() {
            base.paths.installer_root = other.paths.installer_root.clone();
        }
        if other.paths.metadata_root.is_some() {
            base.paths.metadata_root = other.paths.metadata_root.clone();
        }

        // Scan
        if other.scan.archives.is_some() {
            base.scan.archives = other.scan.archives;
        }
        if other.scan.follow_symlinks.is_some() {
            base.scan.follow_symlinks = other.scan.follow_symlinks;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }

        // Remote
        if other.remote.fetch_delay_ms.is_some() {
            base.remote.fetch_delay_ms = other.remote.fetch_delay_ms;
        }
        if other.remote.request_delay_ms.is_some() {
            base.remote.request_delay_ms = other.remote.request_delay_ms;
        }
        if other.remote.asset_delay_ms.is_some() {
            base.remote.asset_delay_ms = other.remote.asset_delay_ms;
        }
        if other.remote.search_timeout_secs.is_some() {
            base.remote.search_timeout_secs = other.remote.search_timeout_secs;
        }
        if other.remote.product_timeout_secs.is_some() {
            base.remote.product_timeout_secs = other.remote.product_timeout_secs;
        }
        if other.remote.download_assets.is_some() {
            base.remote.download_assets = other.remote.download_assets;
        }
        if other.remote.screenshot_limit.is_some() {
            base.remote.screenshot_limit = other.remote.screenshot_limit;
        }
        if other.remote.video_limit.is_some() {
            base.remote.video_limit = other.remote.video_limit;
        }

        // Notify
        if other.notify.discord_webhook_url.is_some() {
            base.notify.discord_webhook_url = other.notify.discord_webhook_url.clone();
        }

        // Schedule
        if other.schedule.expression.is_some() {
            base.schedule.expression = other.schedule.expression.clone();
        }
    }

    /// Apply environment variable overrides. Blank values are ignored.
    fn apply_env_overrides(config: &mut ShelfConfig) {
        if let Some(val) = env_value(ENV_INSTALLER_PATH) {
            config.paths.installer_root = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value(ENV_METADATA_PATH) {
            config.paths.metadata_root = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value(ENV_SCAN_SCHEDULE) {
            config.schedule.expression = Some(val);
        }
        if let Some(val) = env_value(ENV_DISCORD_WEBHOOK_URL) {
            config.notify.discord_webhook_url = Some(val);
        }
        if let Some(val) = env_value(ENV_SCAN_THREADS) {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Some(val) = env_value(ENV_FETCH_DELAY_MS) {
            if let Ok(v) = val.parse::<u64>() {
                config.remote.fetch_delay_ms = Some(v);
            }
        }
        if let Some(val) = env_value(ENV_ARCHIVES) {
            if let Ok(v) = val.parse::<bool>() {
                config.scan.archives = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ShelfConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.installer_root {
            config.paths.installer_root = Some(v.clone());
        }
        if let Some(ref v) = cli.metadata_root {
            config.paths.metadata_root = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
