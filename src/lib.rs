//! DiskTider - duplicate file finder
//!
//! Finds files with identical content under a directory in two stages:
//! files are bucketed by size, then every member of a shared-size bucket is
//! hashed (streamed MD5) and files with equal digests are grouped. Each group
//! is ranked so the member whose name looks least like a copy is kept; the
//! rest can be moved to the system trash or removed permanently.
//!
//! The library half is usable on its own:
//!
//! ```no_run
//! use disktider::actions::{default_selection, delete_batch, DeleteConfig};
//! use disktider::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new("/music")).unwrap();
//! println!("{} reclaimable", summary.reclaimable_display());
//!
//! let outcome = delete_batch(&default_selection(&groups), &DeleteConfig::trash(), None);
//! println!("{}", outcome.summary());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use actions::{
    default_selection, delete_batch, validate_preserves_copy, DeleteConfig, DeleteMode,
    DeleteProgressCallback, DeletionRequest, TrashCapability,
};
use cli::{Cli, Commands, OutputFormat, ScanArgs};
use config::Settings;
use duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig};
use error::ExitCode;
use output::{JsonOutput, TextReport};
use progress::Progress;
use scanner::{ExtensionFilter, PathFilter, WalkerConfig};

/// Run the CLI application.
///
/// # Errors
///
/// Returns an error for a bad scan root, a refused deletion, or a failure to
/// install the signal handler or write the report. Per-file problems never
/// surface here; they are reflected in the returned exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.quiet),
    }
}

fn run_scan(args: &ScanArgs, quiet: bool) -> Result<ExitCode> {
    if args.needs_confirmation() {
        bail!("Refusing to delete without confirmation: pass --yes, or --dry-run to preview");
    }

    let mut settings = Settings::load();
    let path: PathBuf = args
        .path
        .clone()
        .or_else(|| settings.last_directory.clone())
        .context("No directory given and none remembered from a previous scan")?;

    let music = args.music_filter(settings.music_filter);
    let recursive = args.recursive_scan(settings.recursive_scan);

    let shutdown = signal::install_handler()?;
    let progress = Arc::new(Progress::new(quiet || args.output == OutputFormat::Json));

    let config = FinderConfig::default()
        .with_walker_config(walker_config(args, music, recursive))
        .with_shutdown_flag(shutdown.flag())
        .with_progress_callback(progress.clone())
        .with_chunk_size(args.chunk_size);

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(&path)?;

    if !summary.interrupted {
        settings.music_filter = music;
        settings.recursive_scan = recursive;
        settings.last_directory = Some(path);
        if let Err(e) = settings.save() {
            log::warn!("Could not save settings: {}", e);
        }
    }

    let mode = if args.permanent {
        DeleteMode::Permanent
    } else {
        DeleteMode::Trash
    };

    let deletion = if args.delete && !summary.interrupted && !shutdown.is_shutdown_requested() {
        let requests = default_selection(&groups);
        ensure_copies_preserved(&groups, &requests)?;

        let config = match mode {
            DeleteMode::Trash => DeleteConfig::trash(),
            DeleteMode::Permanent => DeleteConfig::permanent(),
        }
        .with_dry_run(args.dry_run)
        .with_trash_capability(TrashCapability::detect())
        .with_fallback(args.trash_fallback.into());

        let callback: &dyn DeleteProgressCallback = &*progress;
        Some(delete_batch(&requests, &config, Some(callback)))
    } else {
        None
    };

    let exit_code = ExitCode::from_outcome(groups.len(), &summary, deletion.as_ref());
    let mut out = std::io::stdout().lock();

    match args.output {
        OutputFormat::Text => {
            let mut report = TextReport::new(&groups, &summary);
            if let Some(ref outcome) = deletion {
                report = report.with_deletion(outcome, args.dry_run);
            }
            report.write_to(&mut out)?;
        }
        OutputFormat::Json => {
            let mut output = JsonOutput::new(&groups, &summary, exit_code);
            if let Some(ref outcome) = deletion {
                output = output.with_deletion(outcome, mode, args.dry_run);
            }
            output.write_to(&mut out, true)?;
        }
    }

    Ok(exit_code)
}

fn walker_config(args: &ScanArgs, music: bool, recursive: bool) -> WalkerConfig {
    let extensions = if music {
        Some(ExtensionFilter::music())
    } else if args.ext.is_empty() {
        None
    } else {
        Some(ExtensionFilter::new(&args.ext))
    };

    let path_filter = if args.no_default_skips {
        PathFilter::empty()
    } else {
        PathFilter::default()
    }
    .with_patterns(&args.skip_patterns);

    WalkerConfig::default()
        .with_recursive(recursive)
        .with_follow_symlinks(args.follow_symlinks)
        .with_extensions(extensions)
        .with_path_filter(path_filter)
}

/// Guard against a selection that would leave some group with no copy.
fn ensure_copies_preserved(groups: &[DuplicateGroup], requests: &[DeletionRequest]) -> Result<()> {
    for group in groups {
        let group_paths = group.paths();
        let selected: Vec<PathBuf> = requests
            .iter()
            .filter(|r| group_paths.contains(&r.path))
            .map(|r| r.path.clone())
            .collect();
        validate_preserves_copy(&selected, &group_paths)?;
    }
    Ok(())
}
