//! Configuration system for gogshelf.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod notify_config;
pub mod paths_config;
pub mod remote_config;
pub mod scan_config;
pub mod schedule_config;
pub mod shelf_config;

pub use notify_config::NotifyConfig;
pub use paths_config::PathsConfig;
pub use remote_config::RemoteConfig;
pub use scan_config::ScanConfig;
pub use schedule_config::ScheduleConfig;
pub use shelf_config::{CliOverrides, ShelfConfig};
