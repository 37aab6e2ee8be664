//! Shapes of GOG responses and of the stored `game.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First product of a catalogue search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: u64,
    pub slug: Option<String>,
    pub title: Option<String>,
}

/// The first product of an `/games/ajax/filtered` response with a usable id.
pub fn first_search_hit(response: &Value) -> Option<SearchHit> {
    let first = response.get("products")?.as_array()?.first()?;
    Some(SearchHit {
        id: value_as_u64(first.get("id")?)?,
        slug: string_field(first, "slug"),
        title: string_field(first, "title"),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameLinks {
    pub product_card: Option<String>,
    pub support: Option<String>,
    pub forum: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameImages {
    pub background: Option<String>,
    pub logo: Option<String>,
    pub icon: Option<String>,
}

/// Normalized product record written to `<game dir>/game.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDocument {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub slug: Option<String>,
    /// Plain text or the API's `{lead, full, whats_cool_about_it}` object.
    pub description: Value,
    pub release_date: Option<String>,
    pub links: GameLinks,
    pub images: GameImages,
    pub content_system_compatibility: Value,
    pub screenshots: Vec<Value>,
    pub videos: Vec<Value>,
    pub game_type: Option<String>,
    #[serde(default)]
    pub screenshots_local: Vec<String>,
    #[serde(default)]
    pub videos_local: Vec<String>,
}

impl GameDocument {
    /// Keep the fields gogshelf shows; absent values become empty.
    pub fn from_product(raw: &Value) -> Self {
        let links = raw.get("links").cloned().unwrap_or_default();
        let images = raw.get("images").cloned().unwrap_or_default();
        Self {
            id: raw.get("id").and_then(value_as_u64),
            title: string_field(raw, "title"),
            slug: string_field(raw, "slug"),
            description: match raw.get("description") {
                Some(Value::Null) | None => Value::String(String::new()),
                Some(v) => v.clone(),
            },
            release_date: string_field(raw, "release_date"),
            links: GameLinks {
                product_card: string_field(&links, "product_card"),
                support: string_field(&links, "support"),
                forum: string_field(&links, "forum"),
            },
            images: GameImages {
                background: string_field(&images, "background"),
                logo: string_field(&images, "logo"),
                icon: string_field(&images, "icon"),
            },
            content_system_compatibility: match raw.get("content_system_compatibility") {
                Some(v @ Value::Object(_)) => v.clone(),
                _ => Value::Object(Map::new()),
            },
            screenshots: array_field(raw, "screenshots"),
            videos: array_field(raw, "videos"),
            game_type: string_field(raw, "game_type"),
            screenshots_local: Vec::new(),
            videos_local: Vec::new(),
        }
    }
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn array_field(value: &Value, field: &str) -> Vec<Value> {
    value
        .get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
