/// Download targets for exported files

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait DownloadSink {
    /// Store `bytes` under `filename` and return where it ended up.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes downloads into a directory, overwriting same-named files
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's download directory, or the current directory.
    pub fn default_location() -> Self {
        Self::new(dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::DownloadFailed(format!("{}: {}", self.dir.display(), e)))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| Error::DownloadFailed(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Keeps downloads in memory; clones share the same list
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .map_err(|_| Error::DownloadFailed("download list lock poisoned".into()))?
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));
        let path = sink.save("badge.png", b"png").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png".to_vec());
    }
}
