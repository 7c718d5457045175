//! Streaming MD5 file hasher with cooperative cancellation.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in fixed-size chunks (64 KiB by default) and feeds
//! them into a running MD5 context. The 128-bit digest identifies content for
//! deduplication only; collisions are an accepted risk and nothing here is
//! security-sensitive.
//!
//! The shutdown flag is polled before every chunk. When it is set the file is
//! abandoned and [`HashError::Interrupted`] is returned; no partial digest
//! ever escapes.
//!
//! # Example
//!
//! ```no_run
//! use disktider::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.hash_file(Path::new("song.mp3")).unwrap();
//! println!("{}", hash_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::HashError;

/// 128-bit content digest.
pub type Hash = [u8; 16];

/// Default read size per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest accepted read size per chunk; one buffer of this size is
/// allocated per hashed file.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Chunked content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default chunk size and no shutdown flag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Set the chunk size, clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Set the shutdown flag polled before each chunk.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Configured chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Compute the digest of the whole file at `path`.
    ///
    /// # Errors
    ///
    /// - `Interrupted` if the shutdown flag was observed mid-file
    /// - `NotFound` / `PermissionDenied` if the file cannot be opened
    /// - `Io` for any other read failure
    pub fn hash_file(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let mut context = md5::Context::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io_error(path, e)),
            };
            context.consume(&buffer[..read]);
        }

        Ok(context.compute().0)
    }
}

fn map_io_error(path: &Path, error: std::io::Error) -> HashError {
    match error.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

/// Lowercase hex rendering of a digest.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;
    hash.iter().fold(String::with_capacity(32), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// Parse a 32-character hex string back into a digest.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<Hash> {
    if hex.len() != 32 || !hex.is_ascii() {
        return None;
    }
    let mut hash = [0u8; 16];
    for (i, byte) in hash.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(hash)
}
