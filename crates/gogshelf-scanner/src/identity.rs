//! Identity Deriver: stable keys and display names from path structure.
//!
//! Everything here is pure. Keys depend only on the container path
//! relative to the scan root and the entry name inside an archive, never
//! on file content, so an unchanged tree always yields identical keys.

use std::path::{Component, Path};

use gogshelf_core::constants::{
    INSTALLER_EXTENSION, INSTALLER_PREFIX, UNKNOWN_DISPLAY_NAME, UNKNOWN_KEY,
};

use crate::archive::archive_base_name;

/// Stable key for an artifact. Only `[A-Za-z0-9._-]` survives; every other
/// character becomes `_`. The result is never empty and never starts or
/// ends with `_`.
pub fn derive_key(relative_path: &str, inner_path: Option<&str>) -> String {
    let mut key = sanitize(relative_path);
    if let Some(inner) = inner_path.filter(|s| !s.is_empty()) {
        key.push('_');
        key.push_str(&sanitize(inner));
    }
    let trimmed = key.trim_matches('_');
    if trimmed.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `path` relative to `root` with components joined by `/`, or `None`
/// when `path` is outside `root`.
pub fn relative_key_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Human-oriented name for searching metadata.
///
/// Standalone installers take their parent directory's name; archived ones
/// take the archive name without extension or volume suffix.
pub fn derive_display_name(container_path: &Path, inner_path: Option<&str>) -> String {
    if inner_path.is_some() {
        let base = archive_base_name(container_path);
        let name = underscores_to_spaces(&base);
        if !name.is_empty() {
            return name;
        }
        return container_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string());
    }

    // A named parent always wins, even when nothing is left after conversion.
    let name = match container_path.parent().and_then(Path::file_name) {
        Some(parent) => underscores_to_spaces(&parent.to_string_lossy()),
        None => container_path
            .file_stem()
            .map(|s| underscores_to_spaces(&s.to_string_lossy()))
            .unwrap_or_default(),
    };
    if name.is_empty() {
        UNKNOWN_DISPLAY_NAME.to_string()
    } else {
        name
    }
}

/// `setup_*.exe`, case-insensitive.
pub fn is_installer_name(name: &str) -> bool {
    let prefix_len = INSTALLER_PREFIX.len();
    let suffix_len = INSTALLER_EXTENSION.len() + 1;
    if name.len() < prefix_len + suffix_len {
        return false;
    }
    let bytes = name.as_bytes();
    let (head, tail) = (&bytes[..prefix_len], &bytes[bytes.len() - suffix_len..]);
    head.eq_ignore_ascii_case(INSTALLER_PREFIX.as_bytes())
        && tail[0] == b'.'
        && tail[1..].eq_ignore_ascii_case(INSTALLER_EXTENSION.as_bytes())
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn underscores_to_spaces(raw: &str) -> String {
    raw.replace('_', " ").trim().to_string()
}
