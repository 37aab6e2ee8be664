//! Error handling for gogshelf.
//! One error enum per subsystem, `thiserror` only.

pub mod archive_error;
pub mod config_error;
pub mod error_code;
pub mod flow_error;
pub mod remote_error;
pub mod schedule_error;
pub mod storage_error;

pub use archive_error::ArchiveError;
pub use config_error::ConfigError;
pub use error_code::ShelfErrorCode;
pub use flow_error::FlowError;
pub use remote_error::RemoteError;
pub use schedule_error::ScheduleError;
pub use storage_error::StorageError;
