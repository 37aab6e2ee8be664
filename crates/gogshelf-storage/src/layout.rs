//! Paths under the metadata root.

use std::fs;
use std::path::{Path, PathBuf};

use gogshelf_core::constants::{GAME_JSON, OVERRIDE_JSON, SCAN_STATE_FILE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLayout {
    root: PathBuf,
}

impl MetadataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SCAN_STATE_FILE)
    }

    /// Folder for one game. The key is re-sanitized, so a hand-typed key
    /// can never escape the metadata root.
    pub fn game_dir(&self, key: &str) -> PathBuf {
        self.root.join(safe_dir_name(key))
    }

    pub fn game_json_path(&self, key: &str) -> PathBuf {
        self.game_dir(key).join(GAME_JSON)
    }

    pub fn override_path(&self, key: &str) -> PathBuf {
        self.game_dir(key).join(OVERRIDE_JSON)
    }

    /// Keys of every game folder holding `game.json` or `override.json`,
    /// sorted. Folders starting with `_` are reserved.
    pub fn list_keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !name.starts_with('_'))
            .filter(|name| {
                let dir = self.root.join(name);
                dir.join(GAME_JSON).is_file() || dir.join(OVERRIDE_JSON).is_file()
            })
            .collect();
        keys.sort();
        keys
    }
}

fn safe_dir_name(key: &str) -> String {
    let name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match name.as_str() {
        "" | "." | ".." => name.replace('.', "_") + "_",
        _ => name,
    }
}
