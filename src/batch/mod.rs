use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type BatchResult<T> = std::result::Result<T, BatchError>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to list staging directory {path}: {source}")]
    ListStaging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Not an operator-facing error: the session just ends cleanly.
    #[error("no pending images remain in the batch")]
    EndOfBatch,
}

/// Ordered traversal of the staged images that still need cropping.
#[derive(Debug, Default)]
pub struct BatchTracker {
    entries: Vec<PathBuf>,
    index: usize,
}

impl BatchTracker {
    /// Scans the staging directory and keeps every staged file whose name is
    /// not already present in the output directory, or every staged file
    /// when `redo` is set. Entries are sorted by name so a re-run visits the
    /// batch in the same order.
    pub fn scan(staging_dir: &Path, output_dir: &Path, redo: bool) -> BatchResult<Self> {
        let listing = fs::read_dir(staging_dir).map_err(|source| BatchError::ListStaging {
            path: staging_dir.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|source| BatchError::ListStaging {
                path: staging_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let already_cropped = path
                .file_name()
                .map(|name| output_dir.join(name).exists())
                .unwrap_or(false);
            if redo || !already_cropped {
                entries.push(path);
            }
        }
        entries.sort();

        tracing::info!(pending = entries.len(), redo, "scanned staging directory");
        Ok(Self { entries, index: 0 })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.index).map(PathBuf::as_path)
    }

    /// Moves to the next pending entry, or fails with `EndOfBatch` once the
    /// last entry has been passed.
    pub fn advance(&mut self) -> BatchResult<&Path> {
        self.index = (self.index + 1).min(self.entries.len());
        match self.entries.get(self.index) {
            Some(path) => Ok(path.as_path()),
            None => Err(BatchError::EndOfBatch),
        }
    }

    /// Presentational `(processed, total)` pair, recomputed on every call.
    pub fn progress(&self) -> (usize, usize) {
        (self.index, self.entries.len())
    }
}
