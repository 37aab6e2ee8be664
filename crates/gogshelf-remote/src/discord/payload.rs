//! Webhook payload builders. Pure; delivery lives in the notifier.

use gogshelf_core::constants::NOTIFY_LIST_LIMIT;
use gogshelf_core::events::types::ScanFinishedEvent;
use serde_json::{json, Value};

pub const COLOR_FINISHED: u32 = 0x00FF00;
pub const COLOR_ADDED: u32 = 0x3498DB;
pub const COLOR_REMOVED: u32 = 0xE74C3C;
pub const COLOR_ERROR: u32 = 0xFF0000;

pub fn scan_started() -> Value {
    json!({ "content": "GOG Games Browser: Scan started." })
}

pub fn scan_finished(event: &ScanFinishedEvent) -> Value {
    let description = format!(
        "Total: {} | Added: {} | Removed: {} | Updated: {}",
        event.total, event.added, event.removed, event.changed
    );
    embed("Scan finished", &description, COLOR_FINISHED)
}

/// `None` when there is nothing to announce.
pub fn games_added(titles: &[String]) -> Option<Value> {
    if titles.is_empty() {
        return None;
    }
    Some(embed(
        "New games detected",
        &bullet_list(titles, NOTIFY_LIST_LIMIT),
        COLOR_ADDED,
    ))
}

pub fn games_removed(keys: &[String]) -> Option<Value> {
    if keys.is_empty() {
        return None;
    }
    Some(embed(
        "Games removed (installer no longer found)",
        &bullet_list(keys, NOTIFY_LIST_LIMIT),
        COLOR_REMOVED,
    ))
}

pub fn error(message: &str, detail: &str) -> Value {
    let description = if detail.is_empty() {
        message.to_string()
    } else {
        format!("{message}\n{detail}")
    };
    embed("GOG Browser error", &description, COLOR_ERROR)
}

/// `• item` lines, at most `limit`, then ` and N more`.
pub fn bullet_list(items: &[String], limit: usize) -> String {
    let mut text = items
        .iter()
        .take(limit)
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n");
    if items.len() > limit {
        text.push_str(&format!(" and {} more", items.len() - limit));
    }
    text
}

fn embed(title: &str, description: &str, color: u32) -> Value {
    json!({
        "embeds": [{
            "title": title,
            "description": description,
            "color": color,
        }]
    })
}
