//! Catalog view: installer info joined with stored metadata and overrides.

use gogshelf_scanner::{ArtifactEntry, ArtifactSet, ContainerKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::read_json;
use crate::layout::MetadataLayout;
use crate::overrides::{Override, OverrideStore};

const GOG_BASE_URL: &str = "https://www.gog.com";

/// Where an installer lives, from a fresh discovery or from the cache in
/// the override record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerInfo {
    pub path_type: String,
    pub installer_path: String,
    pub internal_path: Option<String>,
    pub display_name: String,
}

impl InstallerInfo {
    /// Cached info from an override record; missing fields fall back to
    /// a standalone installer named after its key.
    pub fn from_override(key: &str, record: Option<&Override>) -> Self {
        let record = record.cloned().unwrap_or_default();
        Self {
            path_type: record
                .path_type
                .unwrap_or_else(|| ContainerKind::Standalone.path_type().to_string()),
            installer_path: record.installer_path.unwrap_or_default(),
            internal_path: record.internal_path,
            display_name: record.display_name.unwrap_or_else(|| key.to_string()),
        }
    }
}

impl From<&ArtifactEntry> for InstallerInfo {
    fn from(entry: &ArtifactEntry) -> Self {
        Self {
            path_type: entry.container_kind().path_type().to_string(),
            installer_path: entry.container_path.display().to_string(),
            internal_path: entry.inner_path().map(str::to_string),
            display_name: entry.display_name.clone(),
        }
    }
}

/// One game as presented by `list` and `show`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub key: String,
    pub path_type: String,
    pub installer_path: String,
    pub internal_path: Option<String>,
    pub display_name: String,
    pub gog_title: Option<String>,
    pub gog_slug: Option<String>,
    pub gog_link: Option<String>,
    pub thumbnail: Option<String>,
    pub screenshots_local: Vec<String>,
    pub videos_local: Vec<String>,
    pub gog_search_name_override: Option<String>,
    /// Text or the product API's structured description, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// The subset of `game.json` the catalog reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredGame {
    title: Option<String>,
    slug: Option<String>,
    links: Option<StoredLinks>,
    images: Option<StoredImages>,
    screenshots_local: Option<Vec<String>>,
    videos_local: Option<Vec<String>>,
    description: Option<Value>,
    release_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredLinks {
    product_card: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredImages {
    logo: Option<String>,
    background: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    overrides: OverrideStore,
}

impl Catalog {
    pub fn new(layout: MetadataLayout) -> Self {
        Self {
            overrides: OverrideStore::new(layout),
        }
    }

    fn layout(&self) -> &MetadataLayout {
        self.overrides.layout()
    }

    /// Join installer info with whatever metadata is stored for `key`.
    pub fn merge(&self, key: &str, installer: &InstallerInfo) -> CatalogRecord {
        let mut record = CatalogRecord {
            id: key.to_string(),
            key: key.to_string(),
            path_type: installer.path_type.clone(),
            installer_path: installer.installer_path.clone(),
            internal_path: installer.internal_path.clone(),
            display_name: installer.display_name.clone(),
            gog_title: None,
            gog_slug: None,
            gog_link: None,
            thumbnail: None,
            screenshots_local: Vec::new(),
            videos_local: Vec::new(),
            gog_search_name_override: None,
            description: None,
            release_date: None,
        };

        if let Some(name) = self
            .overrides
            .load(key)
            .and_then(|o| o.gog_search_name)
            .filter(|n| !n.is_empty())
        {
            record.gog_search_name_override = Some(name);
        }

        if let Some(game) = read_json::<StoredGame>(&self.layout().game_json_path(key)) {
            record.gog_title = game.title;
            record.gog_slug = game.slug;
            record.gog_link = game
                .links
                .and_then(|l| l.product_card)
                .filter(|l| !l.is_empty())
                .map(|l| absolutize_link(&l));
            record.thumbnail = game
                .images
                .and_then(|i| first_non_empty([i.logo, i.background, i.icon]))
                .map(|t| absolutize_image(&t));
            record.screenshots_local = game.screenshots_local.unwrap_or_default();
            record.videos_local = game.videos_local.unwrap_or_default();
            record.description = Some(
                game.description
                    .filter(|d| !d.is_null())
                    .unwrap_or_else(|| Value::String(String::new())),
            );
            record.release_date = game.release_date;
        }
        record
    }

    /// A record built from stored files only. `None` when the key has
    /// neither an override nor a `game.json`.
    pub fn record_for_key(&self, key: &str) -> Option<CatalogRecord> {
        let stored = self.overrides.load(key);
        let has_game = self.layout().game_json_path(key).is_file();
        if stored.is_none() && !has_game {
            return None;
        }
        let installer = InstallerInfo::from_override(key, stored.as_ref());
        Some(self.merge(key, &installer))
    }

    /// Records for every discovered artifact, in discovery order.
    pub fn list(&self, artifacts: &ArtifactSet) -> Vec<CatalogRecord> {
        artifacts
            .iter()
            .map(|entry| self.merge(&entry.key, &InstallerInfo::from(entry)))
            .collect()
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

fn absolutize_link(link: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!("{GOG_BASE_URL}{link}")
    }
}

fn absolutize_image(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https:{url}")
    }
}
