//! Optional archive packaging of per-ticker files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::SyncError;

/// Collects per-ticker files into an aggregate artifact during a run.
pub trait Archiver {
    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), SyncError>;
}

/// Rebuilds a zip of all current per-ticker JSON files each run.
pub struct ZipArchiver {
    writer: ZipWriter<File>,
}

impl ZipArchiver {
    /// Creates (truncating) the archive at `path`.
    pub fn create(path: &Path) -> Result<Self, SyncError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: ZipWriter::new(file),
        })
    }

    /// Finalizes the archive. Must be called for the central directory
    /// to be written.
    pub fn finish(mut self) -> Result<(), SyncError> {
        self.writer.finish()?;
        Ok(())
    }
}

impl Archiver for ZipArchiver {
    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), SyncError> {
        self.writer.start_file(name, SimpleFileOptions::default())?;
        self.writer.write_all(bytes)?;
        Ok(())
    }
}
