//! Advisory classification of paths that live in sensitive locations.
//!
//! Deleting a duplicate out of a program or system directory can break an
//! installed application even when the bytes are identical elsewhere. The
//! core never acts on this; the report layer uses it to flag such entries.

use serde::Serialize;
use std::path::Path;

use super::filter::normalize;

/// Path fragments that mark a file as risky to delete.
pub const RISKY_PATH_KEYWORDS: &[&str] = &[
    "SteamLibrary",
    "Program Files",
    "Program Files (x86)",
    "Windows",
    "AppData/Local",
    "Users/Default",
    "Library/Application Support",
    "System Volume Information",
];

/// Risk tag attached to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Ordinary user location.
    Safe,
    /// Inside a system or application directory.
    Risky,
}

impl RiskLevel {
    /// Whether this is [`RiskLevel::Risky`].
    #[must_use]
    pub fn is_risky(self) -> bool {
        self == Self::Risky
    }
}

/// Classify `path` by case-insensitive, separator-normalized substring match.
#[must_use]
pub fn classify(path: &Path) -> RiskLevel {
    let haystack = normalize(&path.to_string_lossy());
    let risky = RISKY_PATH_KEYWORDS
        .iter()
        .any(|keyword| haystack.contains(normalize(keyword).as_str()));

    if risky {
        RiskLevel::Risky
    } else {
        RiskLevel::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_risky_locations() {
        assert_eq!(
            classify(Path::new("C:\\Program Files\\App\\lib.dll")),
            RiskLevel::Risky
        );
        assert_eq!(
            classify(Path::new("C:\\Users\\me\\AppData\\Local\\x.bin")),
            RiskLevel::Risky
        );
        assert_eq!(
            classify(Path::new("/Users/me/Library/Application Support/app/db")),
            RiskLevel::Risky
        );
        assert_eq!(
            classify(Path::new("/mnt/d/steamlibrary/game.pak")),
            RiskLevel::Risky
        );
    }

    #[test]
    fn test_classify_safe_locations() {
        assert_eq!(classify(Path::new("/home/me/Music/a.mp3")), RiskLevel::Safe);
        assert_eq!(classify(Path::new("D:\\Photos\\2020\\b.jpg")), RiskLevel::Safe);
        assert!(!classify(Path::new("/tmp/x")).is_risky());
    }
}
