//! Multi-volume archive recognition.
//!
//! A set split as `Game.part01.rar`, `Game.part02.rar`, ... is one logical
//! archive. Only the first volume is ever handed to the backend, which
//! follows the remaining volumes on its own.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use gogshelf_core::constants::ARCHIVE_EXTENSION;

static VOLUME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.part(\d+)\.rar$").expect("volume suffix pattern is valid")
});

static STEM_VOLUME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.part\d+$").expect("stem suffix pattern is valid"));

/// Extension check, case-insensitive.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// The `N` of a `.partN.rar` name, if the name carries a volume suffix.
pub fn volume_number(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let caps = VOLUME_SUFFIX.captures(name)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Whether this file should be opened to list the logical archive.
///
/// Plain `.rar` files are always first volumes. `part1`, `part01` and
/// `part001` all count as volume one. Non-archives are never first volumes.
pub fn is_first_volume(path: &Path) -> bool {
    if !is_archive(path) {
        return false;
    }
    let has_suffix = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| VOLUME_SUFFIX.is_match(n));
    if !has_suffix {
        return true;
    }
    volume_number(path) == Some(1)
}

/// Archive file stem with any `.partN` volume suffix removed.
pub fn archive_base_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let is_volume = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| VOLUME_SUFFIX.is_match(n));
    if is_volume {
        STEM_VOLUME_SUFFIX.replace(&stem, "").into_owned()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_archives_case_insensitively() {
        assert!(is_archive(Path::new("/x/Game.rar")));
        assert!(is_archive(Path::new("/x/GAME.RAR")));
        assert!(is_archive(Path::new("/x/Game.part02.Rar")));
        assert!(!is_archive(Path::new("/x/Game.zip")));
        assert!(!is_archive(Path::new("/x/rar")));
    }

    #[test]
    fn first_volume_detection() {
        assert!(is_first_volume(Path::new("Game.rar")));
        assert!(is_first_volume(Path::new("Game.part1.rar")));
        assert!(is_first_volume(Path::new("Game.part01.rar")));
        assert!(is_first_volume(Path::new("Game.PART001.RAR")));
        assert!(!is_first_volume(Path::new("Game.part02.rar")));
        assert!(!is_first_volume(Path::new("Game.part10.rar")));
        assert!(!is_first_volume(Path::new("setup_game.exe")));
    }

    #[test]
    fn volume_numbers() {
        assert_eq!(volume_number(Path::new("a.part03.rar")), Some(3));
        assert_eq!(volume_number(Path::new("a.rar")), None);
        assert_eq!(volume_number(Path::new("a.part.rar")), None);
    }

    #[test]
    fn base_name_strips_volume_suffix_only() {
        assert_eq!(archive_base_name(Path::new("Game_Title.part01.rar")), "Game_Title");
        assert_eq!(archive_base_name(Path::new("Game_Title.Part2.RAR")), "Game_Title");
        assert_eq!(archive_base_name(Path::new("Game.partial.rar")), "Game.partial");
        assert_eq!(archive_base_name(Path::new("Game.rar")), "Game");
    }

    #[test]
    fn base_name_ignores_directory() {
        assert_eq!(
            archive_base_name(Path::new("/lib/a/Game.part01.rar")),
            archive_base_name(Path::new("/lib/b/Game.rar"))
        );
    }
}
