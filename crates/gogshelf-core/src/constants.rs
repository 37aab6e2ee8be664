//! Shared constants for gogshelf.

/// gogshelf version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot file written at the metadata root after every scan.
pub const SCAN_STATE_FILE: &str = "_scan_state.json";

/// Normalized GOG product record inside a game's metadata folder.
pub const GAME_JSON: &str = "game.json";

/// Per-artifact override record inside a game's metadata folder.
pub const OVERRIDE_JSON: &str = "override.json";

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "gogshelf.toml";

/// Key returned when sanitization leaves nothing behind.
pub const UNKNOWN_KEY: &str = "unknown";

/// Display name returned when no path component yields one.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

// ---- Scanning ----

/// Archive extension recognized by the archive lister.
pub const ARCHIVE_EXTENSION: &str = "rar";

/// Required (case-insensitive) prefix of an installer executable.
pub const INSTALLER_PREFIX: &str = "setup_";

/// Required (case-insensitive) extension of an installer executable.
pub const INSTALLER_EXTENSION: &str = "exe";

/// Default number of archive listing threads (0 = rayon default).
pub const DEFAULT_SCAN_THREADS: usize = 0;

// ---- Remote ----

/// Delay between metadata fetches of one scan.
pub const DEFAULT_FETCH_DELAY_MS: u64 = 800;

/// Delay after each product request to stay below GOG's rate limit.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 800;

/// Delay between asset downloads.
pub const DEFAULT_ASSET_DELAY_MS: u64 = 200;

/// Search request timeout.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 15;

/// Product request timeout.
pub const DEFAULT_PRODUCT_TIMEOUT_SECS: u64 = 20;

/// Asset download timeout.
pub const DEFAULT_ASSET_TIMEOUT_SECS: u64 = 30;

/// Fallback wait when a 429 response carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 10;

/// Upper bound on a server-supplied `Retry-After` wait.
pub const MAX_RETRY_AFTER_SECS: u64 = 300;

/// Maximum number of 429 retries for one product request.
pub const MAX_RATE_LIMIT_RETRIES: u32 = 5;

/// Default number of screenshots downloaded per game.
pub const DEFAULT_SCREENSHOT_LIMIT: usize = 10;

/// Default number of video thumbnails downloaded per game.
pub const DEFAULT_VIDEO_LIMIT: usize = 3;

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("gogshelf/", env!("CARGO_PKG_VERSION"));

// ---- Notifications ----

/// Webhook request timeout.
pub const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Maximum names listed in one notification before "and N more".
pub const NOTIFY_LIST_LIMIT: usize = 10;

/// Maximum error lines included in the error notification.
pub const NOTIFY_ERROR_LINES: usize = 5;

// ---- Scheduling ----

/// Hour of day used by the `daily` schedule.
pub const DEFAULT_DAILY_HOUR: u32 = 2;
