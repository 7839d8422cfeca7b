//! Scratch blobs with scoped local references.
//!
//! Fetched SVG text is parked in a private scratch directory and handed to
//! the decoder through a [`BlobUrl`]. The reference owns its file: dropping
//! it deletes the file and decrements the store's live count, whichever
//! step of the export it was dropped in.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Content type of fetched badge sources
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml;charset=utf-8";

/// A private directory of short-lived blobs
#[derive(Debug)]
pub struct BlobStore {
    dir: TempDir,
    live: Arc<AtomicUsize>,
    next_id: AtomicU64,
}

impl BlobStore {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("badgesmith-blobs-")
            .tempdir()
            .map_err(|e| Error::Other(format!("Failed to create scratch directory: {}", e)))?;
        Ok(Self {
            dir,
            live: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(1),
        })
    }

    /// Write `bytes` into a new blob and return a reference to it.
    pub fn create(&self, bytes: &[u8], content_type: &str) -> Result<BlobUrl> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.path().join(format!("blob-{}", id));
        std::fs::write(&path, bytes)
            .map_err(|e| Error::Other(format!("Failed to write blob {}: {}", path.display(), e)))?;
        self.live.fetch_add(1, Ordering::SeqCst);
        log::debug!("created blob {} ({} bytes, {})", path.display(), bytes.len(), content_type);
        Ok(BlobUrl {
            path,
            content_type: content_type.to_string(),
            live: self.live.clone(),
        })
    }

    /// Number of references not yet released.
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Scoped reference to a blob; released on drop
#[derive(Debug)]
pub struct BlobUrl {
    path: PathBuf,
    content_type: String,
    live: Arc<AtomicUsize>,
}

impl BlobUrl {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn url(&self) -> String {
        format!("blob:file://{}", self.path.display())
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path)
            .map_err(|e| Error::DecodeFailed(format!("Failed to load {}: {}", self.url(), e)))
    }
}

impl Drop for BlobUrl {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("Failed to release blob {}: {}", self.path.display(), e);
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
