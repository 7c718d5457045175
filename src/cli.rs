//! Command-line interface definitions for DiskTider.
//!
//! Global options (verbosity, color, error format) plus one `scan`
//! subcommand that finds duplicates and optionally removes them.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory with a colored text report
//! disktider scan ~/Music
//!
//! # Only music files, JSON report for scripting
//! disktider scan ~/Music --music --output json
//!
//! # Preview what the default selection would remove
//! disktider scan ~/Downloads --delete --dry-run
//!
//! # Verbose mode for debugging
//! disktider -v scan ~/Downloads
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::TrashFallback;
use crate::scanner::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Duplicate file finder with safe removal.
///
/// DiskTider groups files by size, confirms duplicates by content hash,
/// ranks each group so the most "original looking" name is kept, and can
/// move the rest to the system trash.
#[derive(Debug, Parser)]
#[command(name = "disktider")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan (defaults to the last scanned directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Only consider music files (mp3, flac, wav, m4a, aac, ogg, wma)
    #[arg(long, conflicts_with = "ext")]
    pub music: bool,

    /// Consider all files, overriding a saved music filter
    #[arg(long, conflicts_with = "music")]
    pub no_music: bool,

    /// Only consider files with this extension (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub ext: Vec<String>,

    /// Descend into subdirectories, overriding a saved setting
    #[arg(long, conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// Only scan the top-level directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Follow symbolic links during scan
    ///
    /// A file reachable through several links is reported once.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Extra directory name or path fragment to skip (repeatable)
    #[arg(long = "skip", value_name = "PATTERN")]
    pub skip_patterns: Vec<String>,

    /// Do not apply the built-in skip list (system, cache and VCS folders)
    #[arg(long)]
    pub no_default_skips: bool,

    /// Read size per hashing chunk (e.g. 64KiB, 1MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_chunk_size,
          default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Remove every member of each group except the best-ranked one
    #[arg(long)]
    pub delete: bool,

    /// Delete permanently instead of moving to the trash
    #[arg(long, requires = "delete")]
    pub permanent: bool,

    /// What to do when the system trash is unavailable
    #[arg(long, value_enum, default_value = "refuse")]
    pub trash_fallback: FallbackArg,

    /// Show what would be deleted without touching any file
    #[arg(long, requires = "delete")]
    pub dry_run: bool,

    /// Confirm deletion without prompting
    #[arg(short = 'y', long = "yes", requires = "delete")]
    pub yes: bool,
}

impl ScanArgs {
    /// Music filter to use, given the saved preference.
    #[must_use]
    pub fn music_filter(&self, saved: bool) -> bool {
        if self.music {
            true
        } else if self.no_music || !self.ext.is_empty() {
            false
        } else {
            saved
        }
    }

    /// Recursion to use, given the saved preference.
    #[must_use]
    pub fn recursive_scan(&self, saved: bool) -> bool {
        if self.recursive {
            true
        } else if self.no_recursive {
            false
        } else {
            saved
        }
    }

    /// Whether a real (non-dry-run) deletion was requested without `-y`.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        self.delete && !self.dry_run && !self.yes
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON document for scripting
    Json,
}

/// Trash fallback policy as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FallbackArg {
    /// Leave the file and record an error
    Refuse,
    /// Delete permanently instead
    Permanent,
}

impl From<FallbackArg> for TrashFallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Refuse => Self::Refuse,
            FallbackArg::Permanent => Self::Permanent,
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports the following formats:
/// - Plain numbers: "1024" (bytes)
/// - With suffix: "1KB", "1MB", "1GB" (decimal, 1000-based)
/// - With binary suffix: "1KiB", "1MiB", "1GiB" (binary, 1024-based)
///
/// # Examples
///
/// ```
/// use disktider::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

/// Parse a hashing chunk size between one byte and [`MAX_CHUNK_SIZE`].
///
/// # Errors
///
/// Returns an error for unparsable, zero or oversized values.
pub fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Chunk size must be greater than zero".to_string());
    }
    match usize::try_from(bytes) {
        Ok(size) if size <= MAX_CHUNK_SIZE => Ok(size),
        _ => Err(format!(
            "Chunk size too large: {bytes} bytes (maximum {MAX_CHUNK_SIZE})"
        )),
    }
}
