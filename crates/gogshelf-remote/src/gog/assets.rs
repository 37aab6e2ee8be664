//! Screenshot and video-thumbnail selection from product responses.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

const SCREENSHOT_FORMATTER: &str = "ggvgm";
const MAX_FILENAME_CHARS: usize = 200;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-.]").expect("filename pattern is valid"));

/// Protocol-relative URLs (`//images.gog.com/...`) get `https:`.
pub fn ensure_https(url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        url.to_string()
    } else {
        format!("https:{url}")
    }
}

/// `.jpg` when the URL path mentions it, `.png` otherwise.
pub fn asset_extension(url: &str) -> &'static str {
    let path = url.split('?').next().unwrap_or(url);
    if path.contains(".jpg") {
        ".jpg"
    } else {
        ".png"
    }
}

/// File-system safe version of an id or label, at most 200 characters.
pub fn safe_filename(name: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(name, "_");
    let truncated: String = cleaned.chars().take(MAX_FILENAME_CHARS).collect();
    if truncated.is_empty() {
        "file".to_string()
    } else {
        truncated
    }
}

/// Download URLs for up to `limit` screenshots, preferring the `ggvgm`
/// rendition and falling back to the first formatted image.
pub fn screenshot_urls(screenshots: &[Value], limit: usize) -> Vec<String> {
    screenshots
        .iter()
        .take(limit)
        .filter_map(|shot| {
            let formatted = shot.get("formatted_images")?.as_array()?;
            let preferred = formatted
                .iter()
                .find(|f| {
                    f.get("formatter_name").and_then(Value::as_str) == Some(SCREENSHOT_FORMATTER)
                        && non_empty_str(f.get("image_url")).is_some()
                })
                .or_else(|| formatted.first());
            non_empty_str(preferred?.get("image_url")).map(ensure_https)
        })
        .collect()
}

/// `(thumbnail url, file stem)` for up to `limit` videos that have a
/// thumbnail. The stem is the sanitized video id, or `thumb_<n>`.
pub fn video_thumbnails(videos: &[Value], limit: usize) -> Vec<(String, String)> {
    videos
        .iter()
        .take(limit)
        .enumerate()
        .filter_map(|(i, video)| {
            let thumb = match video.get("thumbnail").or_else(|| video.get("thumbnail_url")) {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Object(o)) => o.get("url").and_then(Value::as_str).unwrap_or("").to_string(),
                _ => String::new(),
            };
            if thumb.is_empty() {
                return None;
            }
            let id = match video.get("video_id").or_else(|| video.get("id")) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            let stem = if id.is_empty() {
                format!("thumb_{i}")
            } else {
                safe_filename(&id)
            };
            Some((ensure_https(&thumb), stem))
        })
        .collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn https_prefix() {
        assert_eq!(ensure_https("//images.gog.com/a.jpg"), "https://images.gog.com/a.jpg");
        assert_eq!(ensure_https("https://x/a.jpg"), "https://x/a.jpg");
        assert_eq!(ensure_https(""), "");
    }

    #[test]
    fn extension_ignores_query() {
        assert_eq!(asset_extension("https://x/a.jpg?w=1"), ".jpg");
        assert_eq!(asset_extension("https://x/a.webp?fmt=.jpg"), ".png");
        assert_eq!(asset_extension("https://x/a_ggvgm.jpg"), ".jpg");
    }

    #[test]
    fn filenames_are_sanitized_and_bounded() {
        assert_eq!(safe_filename("abc-DEF_1.2"), "abc-DEF_1.2");
        assert_eq!(safe_filename("a/b c:d"), "a_b_c_d");
        assert_eq!(safe_filename(""), "file");
        assert_eq!(safe_filename(&"x".repeat(300)).len(), 200);
    }

    #[test]
    fn screenshots_prefer_ggvgm() {
        let shots = vec![
            json!({"formatted_images": [
                {"formatter_name": "ggvgl", "image_url": "//img/1_ggvgl.jpg"},
                {"formatter_name": "ggvgm", "image_url": "//img/1_ggvgm.jpg"}
            ]}),
            json!({"formatted_images": [
                {"formatter_name": "other", "image_url": "https://img/2.png"}
            ]}),
            json!({"formatted_images": []}),
            json!({"image_id": "no formatted images"}),
        ];
        assert_eq!(
            screenshot_urls(&shots, 10),
            vec!["https://img/1_ggvgm.jpg", "https://img/2.png"]
        );
        assert_eq!(screenshot_urls(&shots, 1).len(), 1);
    }

    #[test]
    fn video_thumbnails_accept_strings_and_objects() {
        let videos = vec![
            json!({"video_id": "abc:1", "thumbnail": " //img/v1.jpg "}),
            json!({"id": 77, "thumbnail_url": {"url": "https://img/v2.png"}}),
            json!({"video_id": "no-thumb"}),
            json!({"thumbnail": "https://img/v4.jpg"}),
        ];
        let thumbs = video_thumbnails(&videos, 10);
        assert_eq!(
            thumbs,
            vec![
                ("https://img/v1.jpg".to_string(), "abc_1".to_string()),
                ("https://img/v2.png".to_string(), "77".to_string()),
                ("https://img/v4.jpg".to_string(), "thumb_3".to_string()),
            ]
        );
        assert_eq!(video_thumbnails(&videos, 1).len(), 1);
    }
}
