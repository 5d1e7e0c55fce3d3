//! Dataset storage boundary.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SyncError;

/// Reads and writes per-ticker dataset blobs by ticker symbol.
///
/// Keys are ticker symbols; implementations derive their own storage
/// names from them. Failures are storage errors and fatal for a run.
pub trait DatasetStore {
    /// The stored bytes for a ticker, or `None` if nothing is stored.
    fn read(&self, ticker: &str) -> Result<Option<Vec<u8>>, SyncError>;
    /// Stores bytes for a ticker, overwriting any previous content.
    fn write(&mut self, ticker: &str, bytes: &[u8]) -> Result<(), SyncError>;
}

/// One `<TICKER>.json` file per ticker in a data directory.
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, SyncError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ticker.to_uppercase()))
    }
}

impl DatasetStore for LocalStore {
    fn read(&self, ticker: &str) -> Result<Option<Vec<u8>>, SyncError> {
        match fs::read(self.path_for(ticker)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::Storage(e)),
        }
    }

    fn write(&mut self, ticker: &str, bytes: &[u8]) -> Result<(), SyncError> {
        fs::write(self.path_for(ticker), bytes)?;
        Ok(())
    }
}

/// In-memory store used by orchestrator tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored blob, keyed the same way writes are.
    pub fn insert(&mut self, ticker: &str, bytes: Vec<u8>) {
        self.blobs.insert(ticker.to_uppercase(), bytes);
    }

    pub fn get(&self, ticker: &str) -> Option<&[u8]> {
        self.blobs.get(&ticker.to_uppercase()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl DatasetStore for MemoryStore {
    fn read(&self, ticker: &str) -> Result<Option<Vec<u8>>, SyncError> {
        Ok(self.blobs.get(&ticker.to_uppercase()).cloned())
    }

    fn write(&mut self, ticker: &str, bytes: &[u8]) -> Result<(), SyncError> {
        self.blobs.insert(ticker.to_uppercase(), bytes.to_vec());
        Ok(())
    }
}
