//! Per-game override records (`<key>/override.json`).
//!
//! A record carries the user's search-name and product-id overrides plus
//! the installer info cached by the last scan. Fields this crate does not
//! know about are kept and written back untouched.

use std::path::PathBuf;

use gogshelf_core::errors::StorageError;
use gogshelf_scanner::ArtifactEntry;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::json::{read_json, write_json_atomic};
use crate::layout::MetadataLayout;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Override {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gog_search_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_product_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_path: Option<String>,
    /// `"file"` or `"rar"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Override {
    /// The override search name, if one is set and not blank.
    pub fn search_name(&self) -> Option<&str> {
        self.gog_search_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Cache where and what the installer is.
    pub fn record_installer(&mut self, entry: &ArtifactEntry) {
        self.installer_path = Some(entry.container_path.display().to_string());
        self.path_type = Some(entry.container_kind().path_type().to_string());
        self.internal_path = entry.inner_path().map(str::to_string);
        self.display_name = Some(entry.display_name.clone());
    }
}

/// Accepts a number, a numeric string, or null. Anything else reads as
/// no override.
fn lenient_product_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone)]
pub struct OverrideStore {
    layout: MetadataLayout,
}

impl OverrideStore {
    pub fn new(layout: MetadataLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &MetadataLayout {
        &self.layout
    }

    /// Stored record; `None` when absent or malformed.
    pub fn load(&self, key: &str) -> Option<Override> {
        read_json(&self.layout.override_path(key))
    }

    pub fn save(&self, key: &str, record: &Override) -> Result<(), StorageError> {
        write_json_atomic(&self.layout.override_path(key), record)
    }

    /// Load (or start) a record, apply `edit`, save, and return it.
    pub fn update<F>(&self, key: &str, edit: F) -> Result<Override, StorageError>
    where
        F: FnOnce(&mut Override),
    {
        let mut record = self.load(key).unwrap_or_default();
        edit(&mut record);
        self.save(key, &record)?;
        Ok(record)
    }

    /// Search name for metadata lookups: the override when set, else `default`.
    pub fn search_name(&self, key: &str, default: &str) -> String {
        self.load(key)
            .and_then(|r| r.search_name().map(str::to_string))
            .unwrap_or_else(|| default.to_string())
    }

    pub fn product_id(&self, key: &str) -> Option<u64> {
        self.load(key).and_then(|r| r.product_id)
    }

    pub fn game_dir(&self, key: &str) -> PathBuf {
        self.layout.game_dir(key)
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.layout.list_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gogshelf_scanner::Container;

    fn store() -> (tempfile::TempDir, OverrideStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::new(MetadataLayout::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn absent_record_gives_defaults() {
        let (_dir, store) = store();
        assert!(store.load("k").is_none());
        assert_eq!(store.search_name("k", "Fallback"), "Fallback");
        assert_eq!(store.product_id("k"), None);
    }

    #[test]
    fn blank_search_name_falls_back() {
        let (_dir, store) = store();
        store
            .update("k", |r| r.gog_search_name = Some("   ".to_string()))
            .unwrap();
        assert_eq!(store.search_name("k", "Fallback"), "Fallback");
        store
            .update("k", |r| r.gog_search_name = Some("  Witcher 3 ".to_string()))
            .unwrap();
        assert_eq!(store.search_name("k", "Fallback"), "Witcher 3");
    }

    #[test]
    fn product_id_accepts_numbers_and_numeric_strings() {
        let (_dir, store) = store();
        let path = store.layout().override_path("k");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        std::fs::write(&path, br#"{"product_id": 1207658924}"#).unwrap();
        assert_eq!(store.product_id("k"), Some(1207658924));
        std::fs::write(&path, br#"{"product_id": "42"}"#).unwrap();
        assert_eq!(store.product_id("k"), Some(42));
        std::fs::write(&path, br#"{"product_id": "soon"}"#).unwrap();
        assert_eq!(store.product_id("k"), None);
        std::fs::write(&path, br#"{"product_id": null}"#).unwrap();
        assert_eq!(store.product_id("k"), None);
    }

    #[test]
    fn unknown_fields_survive_rewrite() {
        let (_dir, store) = store();
        let path = store.layout().override_path("k");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, br#"{"product_id": 7, "notes": {"rating": 5}}"#).unwrap();

        store
            .update("k", |r| r.display_name = Some("Game".to_string()))
            .unwrap();

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["notes"]["rating"], 5);
        assert_eq!(raw["product_id"], 7);
        assert_eq!(raw["display_name"], "Game");
    }

    #[test]
    fn record_installer_caches_path_info() {
        let entry = ArtifactEntry {
            key: "G_Game.rar_setup_g.exe".to_string(),
            container_path: PathBuf::from("/lib/G/Game.rar"),
            container: Container::Archived {
                inner_path: "setup_g.exe".to_string(),
            },
            display_name: "Game".to_string(),
        };
        let mut record = Override {
            internal_path: Some("stale".to_string()),
            ..Override::default()
        };
        record.record_installer(&entry);
        assert_eq!(record.installer_path.as_deref(), Some("/lib/G/Game.rar"));
        assert_eq!(record.path_type.as_deref(), Some("rar"));
        assert_eq!(record.internal_path.as_deref(), Some("setup_g.exe"));
        assert_eq!(record.display_name.as_deref(), Some("Game"));
    }

    #[test]
    fn malformed_record_loads_as_none() {
        let (_dir, store) = store();
        let path = store.layout().override_path("k");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not json").unwrap();
        assert!(store.load("k").is_none());
        assert_eq!(store.list_keys(), vec!["k"]);
    }
}
