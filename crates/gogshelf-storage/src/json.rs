//! JSON file helpers shared by the stores.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use gogshelf_core::errors::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse `path` as JSON. Missing, unreadable or malformed files are `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable JSON file");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed JSON file ignored");
            None
        }
    }
}

/// Write `value` as pretty JSON, creating parent directories. The file is
/// replaced by rename, so readers never see a half-written document.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let mut json = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    json.push(b'\n');

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, &json).map_err(|e| StorageError::io(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::io(path, e));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
