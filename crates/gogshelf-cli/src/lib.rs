//! gogshelf-cli: the shell around the installer catalog.
//!
//! - flow: one scan from discovery to notification
//! - scheduler: cron-style background scans
//! - args, commands: the `gogshelf` binary

pub mod args;
pub mod commands;
pub mod flow;
pub mod scheduler;

pub use flow::{ScanFlow, ScanSummary};
pub use scheduler::{Schedule, Scheduler, SchedulerHandle};
