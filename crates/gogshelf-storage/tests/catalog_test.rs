//! Catalog merge over a real metadata folder.

use std::fs;
use std::path::PathBuf;

use gogshelf_scanner::{ArtifactEntry, ArtifactSet, Container};
use gogshelf_storage::{Catalog, InstallerInfo, MetadataLayout, Override, OverrideStore};
use serde_json::json;
use tempfile::TempDir;

fn write_game_json(layout: &MetadataLayout, key: &str, value: serde_json::Value) {
    let path = layout.game_json_path(key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

fn archived_entry() -> ArtifactEntry {
    ArtifactEntry {
        key: "W3_Witcher_3.part01.rar_setup_w3.exe".to_string(),
        container_path: PathBuf::from("/lib/W3/Witcher_3.part01.rar"),
        container: Container::Archived {
            inner_path: "setup_w3.exe".to_string(),
        },
        display_name: "Witcher 3".to_string(),
    }
}

#[test]
fn merge_without_metadata_keeps_installer_info() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::new(MetadataLayout::new(dir.path()));
    let entry = archived_entry();

    let record = catalog.merge(&entry.key, &InstallerInfo::from(&entry));

    assert_eq!(record.id, entry.key);
    assert_eq!(record.path_type, "rar");
    assert_eq!(record.installer_path, "/lib/W3/Witcher_3.part01.rar");
    assert_eq!(record.internal_path.as_deref(), Some("setup_w3.exe"));
    assert_eq!(record.display_name, "Witcher 3");
    assert!(record.gog_title.is_none());
    assert!(record.description.is_none());
    assert!(record.screenshots_local.is_empty());
}

#[test]
fn merge_reads_game_json_and_override() {
    let dir = TempDir::new().unwrap();
    let layout = MetadataLayout::new(dir.path());
    let entry = archived_entry();
    write_game_json(
        &layout,
        &entry.key,
        json!({
            "id": 1207658924,
            "title": "The Witcher 3: Wild Hunt",
            "slug": "the_witcher_3_wild_hunt",
            "links": {"product_card": "/en/game/the_witcher_3_wild_hunt"},
            "images": {"logo": "", "background": "//images.gog.com/bg.jpg", "icon": null},
            "screenshots_local": ["screenshots/00.jpg"],
            "videos_local": [],
            "description": "Open world RPG",
            "release_date": "2015-05-19T00:00:00+0300"
        }),
    );
    OverrideStore::new(layout.clone())
        .save(
            &entry.key,
            &Override {
                gog_search_name: Some("Witcher 3 GOTY".to_string()),
                ..Override::default()
            },
        )
        .unwrap();

    let record = Catalog::new(layout).merge(&entry.key, &InstallerInfo::from(&entry));

    assert_eq!(record.gog_title.as_deref(), Some("The Witcher 3: Wild Hunt"));
    assert_eq!(record.gog_slug.as_deref(), Some("the_witcher_3_wild_hunt"));
    assert_eq!(
        record.gog_link.as_deref(),
        Some("https://www.gog.com/en/game/the_witcher_3_wild_hunt")
    );
    assert_eq!(record.thumbnail.as_deref(), Some("https://images.gog.com/bg.jpg"));
    assert_eq!(record.screenshots_local, vec!["screenshots/00.jpg"]);
    assert_eq!(record.gog_search_name_override.as_deref(), Some("Witcher 3 GOTY"));
    assert_eq!(record.description, Some(json!("Open world RPG")));
    assert_eq!(record.release_date.as_deref(), Some("2015-05-19T00:00:00+0300"));
}

#[test]
fn record_for_key_uses_cached_installer_info() {
    let dir = TempDir::new().unwrap();
    let layout = MetadataLayout::new(dir.path());
    let catalog = Catalog::new(layout.clone());
    assert!(catalog.record_for_key("missing").is_none());

    let mut stored = Override::default();
    stored.record_installer(&archived_entry());
    OverrideStore::new(layout).save("cached", &stored).unwrap();

    let record = catalog.record_for_key("cached").unwrap();
    assert_eq!(record.key, "cached");
    assert_eq!(record.path_type, "rar");
    assert_eq!(record.display_name, "Witcher 3");
    assert_eq!(record.internal_path.as_deref(), Some("setup_w3.exe"));
}

#[test]
fn record_for_key_with_only_game_json_defaults_to_standalone() {
    let dir = TempDir::new().unwrap();
    let layout = MetadataLayout::new(dir.path());
    write_game_json(&layout, "bare", json!({"title": "Bare"}));

    let record = Catalog::new(layout).record_for_key("bare").unwrap();
    assert_eq!(record.path_type, "file");
    assert_eq!(record.display_name, "bare");
    assert_eq!(record.installer_path, "");
    assert_eq!(record.gog_title.as_deref(), Some("Bare"));
    assert_eq!(record.description, Some(json!("")));
}

#[test]
fn structured_description_is_passed_through() {
    let dir = TempDir::new().unwrap();
    let layout = MetadataLayout::new(dir.path());
    let description = json!({"lead": "Short", "full": "Long text", "whats_cool_about_it": ""});
    write_game_json(&layout, "g", json!({"title": "G", "description": description.clone()}));

    let record = Catalog::new(layout).record_for_key("g").unwrap();
    assert_eq!(record.description, Some(description));
}

#[test]
fn list_follows_discovery_order() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::new(MetadataLayout::new(dir.path()));
    let mut set = ArtifactSet::new();
    for key in ["b", "a"] {
        set.insert(ArtifactEntry {
            key: key.to_string(),
            container_path: PathBuf::from(format!("/lib/{key}/setup_{key}.exe")),
            container: Container::Standalone,
            display_name: key.to_uppercase(),
        });
    }
    let records = catalog.list(&set);
    let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(records[0].path_type, "file");
}
