//! Content hashing of candidate files.
//!
//! Hashing is the only slow step of a resolution, so it sits behind the
//! [`ChecksumProvider`] trait and honours a caller-owned [`CancelToken`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{Checksum, ResolveError, Result};

const CHUNK_SIZE: usize = 1024 * 1024;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Computes the content checksum of a file.
pub trait ChecksumProvider: Send + Sync {
    fn checksum(&self, path: &Path, cancel: &CancelToken) -> Result<Checksum>;
}

impl<T: ChecksumProvider + ?Sized> ChecksumProvider for &T {
    fn checksum(&self, path: &Path, cancel: &CancelToken) -> Result<Checksum> {
        (**self).checksum(path, cancel)
    }
}

/// In-process SHA-256 over the file contents, read in 1 MiB chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256FileHasher;

impl ChecksumProvider for Sha256FileHasher {
    fn checksum(&self, path: &Path, cancel: &CancelToken) -> Result<Checksum> {
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled {
                path: path.to_path_buf(),
            });
        }

        // The handle is dropped on every return below.
        let file = File::open(path).map_err(|e| ResolveError::io(path, e))?;
        let checksum = hash_reader(BufReader::with_capacity(CHUNK_SIZE, file), path, cancel)?;
        debug!(path = %path.display(), checksum = ?checksum, "hashed");
        Ok(checksum)
    }
}

/// Digest `reader` chunk by chunk, polling `cancel` before each read.
fn hash_reader<R: Read>(mut reader: R, path: &Path, cancel: &CancelToken) -> Result<Checksum> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled {
                path: path.to_path_buf(),
            });
        }
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ResolveError::io(path, e)),
        };
        hasher.update(&buf[..n]);
    }

    Ok(Checksum::from_bytes(hasher.finalize().into()))
}

/// Hash a single file with [`Sha256FileHasher`] and no cancellation.
pub fn sha256_file(path: &Path) -> Result<Checksum> {
    Sha256FileHasher.checksum(path, &CancelToken::new())
}
