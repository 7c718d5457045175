//! Directory skip rules and extension filtering.
//!
//! [`PathFilter`] decides which subdirectories the walker prunes during
//! recursive descent. A directory is skipped when its bare name equals a
//! pattern, or when the joined `root/name` path contains a pattern as a
//! substring. Both comparisons are case-insensitive and treat `\` and `/`
//! as the same separator, so `AppData/Local/Temp` matches on every platform.
//!
//! [`ExtensionFilter`] restricts a scan to file names ending in one of a
//! set of extensions (case-insensitive suffix match).
//!
//! # Example
//!
//! ```
//! use disktider::scanner::PathFilter;
//! use std::path::Path;
//!
//! let filter = PathFilter::default();
//! assert!(filter.should_skip(Path::new("/home/me/project"), "node_modules"));
//! assert!(filter.should_skip(Path::new("C:\\Users\\me\\AppData\\Local"), "Temp"));
//! assert!(!filter.should_skip(Path::new("/home/me"), "Music"));
//! ```

use std::path::Path;

/// Directories that are never descended into by default.
///
/// Entries containing `/` are path fragments; the others usually match a
/// bare directory name but are also checked as fragments.
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    // System temp and cache locations
    "AppData/Local/Temp",
    "AppData/Roaming",
    "AppData/Local/Microsoft/Windows/INetCache",
    "Local Settings/Temp",
    "Windows/Temp",
    // Browser caches and components
    "AppData/Local/Google/Chrome/User Data",
    "Service Worker",
    "CacheStorage",
    "Code Cache",
    "Extensions",
    // Windows system and program files
    "Program Files",
    "Program Files (x86)",
    "$RECYCLE.BIN",
    "System Volume Information",
    "Windows",
    "System32",
    // Game libraries
    "SteamLibrary",
    "steamapps/common",
    "steamapps/workshop",
    "Epic Games",
    // Version control and package managers
    ".git",
    ".svn",
    "node_modules",
    "venv",
    // macOS / Linux caches and trash
    "Library/Caches",
    ".Trash",
    ".cache",
    "Users/Default",
];

/// Preset extension list for the "music only" scan.
pub const MUSIC_EXTENSIONS: &[&str] = &[".mp3", ".flac", ".wav", ".m4a", ".aac", ".ogg", ".wma"];

/// Lowercase and convert every separator to `/`.
pub(crate) fn normalize(s: &str) -> String {
    s.to_lowercase().replace('\\', "/")
}

/// Skip list applied to subdirectories during recursive descent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilter {
    /// Patterns, already normalized (lowercase, `/` separators).
    patterns: Vec<String>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_PATTERNS.iter().copied())
    }
}

impl PathFilter {
    /// Build a filter from arbitrary patterns.
    ///
    /// Blank patterns are ignored; a blank fragment would match every path.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| normalize(p.as_ref().trim()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// A filter that never skips anything.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Add extra patterns on top of the current ones.
    #[must_use]
    pub fn with_patterns<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns.extend(Self::new(extra).patterns);
        self
    }

    /// Whether the filter has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Normalized patterns, in insertion order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Decide whether the subdirectory `dir_name` of `root` must be pruned.
    #[must_use]
    pub fn should_skip(&self, root: &Path, dir_name: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let name = dir_name.to_lowercase();
        let joined = normalize(&root.join(dir_name).to_string_lossy());

        self.patterns
            .iter()
            .any(|pattern| name == *pattern || joined.contains(pattern.as_str()))
    }
}

/// Case-insensitive file-name suffix filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Lowercased extensions, each with a leading dot.
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Build a filter from extensions given with or without the leading dot.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty() && e != ".")
            .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
            .collect();
        Self { extensions }
    }

    /// The preset music filter.
    #[must_use]
    pub fn music() -> Self {
        Self::new(MUSIC_EXTENSIONS.iter().copied())
    }

    /// Normalized extensions.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether the filter lists no extensions (and so accepts every file).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Whether `file_name` passes the filter.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }
}
