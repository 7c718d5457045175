//! Logging infrastructure for DiskTider.
//!
//! Two layers live here:
//!
//! 1. [`init_logging`] configures the process-wide `env_logger` backend for the
//!    CLI binary. Log levels are determined by (in priority order):
//!    `RUST_LOG`, then `--quiet` / `--verbose`, then the info default.
//! 2. [`Reporter`] is the logging collaborator handed to the scanner, finder
//!    and deleter. Core code never reaches for a global logger object; it
//!    reports through whatever `Reporter` it was built with. The default,
//!    [`LogReporter`], forwards to the `log` facade.
//!
//! # Example
//!
//! ```rust,no_run
//! use disktider::logging::{init_logging, LogReporter, Reporter};
//!
//! init_logging(1, false);
//!
//! let reporter = LogReporter;
//! reporter.info("Scan started");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;
use std::sync::Arc;

/// Logging collaborator injected into the core components.
///
/// Implementations must be cheap to call and must never panic; the core
/// reports every stage transition, per-file error and cancellation through
/// this trait.
pub trait Reporter: Send + Sync {
    /// Informational message (stage transitions, summaries).
    fn info(&self, message: &str);

    /// Recoverable problem (permission denied, skipped file).
    fn warning(&self, message: &str);

    /// Failure of a single operation (I/O error, failed deletion).
    fn error(&self, message: &str);

    /// Diagnostic detail.
    fn debug(&self, message: &str);
}

/// [`Reporter`] that forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warning(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }
}

/// Shared handle to the default reporter.
#[must_use]
pub fn default_reporter() -> Arc<dyn Reporter> {
    Arc::new(LogReporter)
}

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// This function should be called once at the start of the application,
/// before any logging calls are made.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
///
/// # Panics
///
/// This function will panic if called more than once, as `env_logger`
/// can only be initialized once per process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);
    builder.init();

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!(
            "Logging initialized at level: {:?}",
            determine_level(verbose, quiet)
        );
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Configure the log format based on build type and verbosity.
///
/// - Debug builds: timestamp, level, and the module path once verbose
/// - Release builds: level + message only
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
