//! File-backed store of labelled ciphertexts.
//!
//! The whole collection lives in one pretty-printed JSON array. There is no
//! in-memory cache: every call re-reads the document, and every mutation
//! rewrites it in full through a temp file that is renamed over the target,
//! so the document on disk is either the old version or the new one.
//!
//! # Concurrency
//!
//! Each mutation is an unlocked read-modify-write cycle. Two writers racing
//! on the same document can lose an update or a delete. Callers that need
//! concurrent writers must serialize them (a single-writer lock around the
//! store, or an append-only log with compaction).

mod error;

pub use error::{StoreError, StoreResult};

use cipherkeep_types::CipherRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Label-unique, insertion-ordered collection of [`CipherRecord`]s.
#[derive(Debug, Clone)]
pub struct CipherStore {
    path: PathBuf,
}

impl CipherStore {
    /// Opens a store backed by `path`. The file is not touched until the
    /// first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing document has been written.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads every record in insertion order. An absent document is an
    /// empty store.
    pub fn load(&self) -> StoreResult<Vec<CipherRecord>> {
        match self.read_existing()? {
            Some(records) => Ok(records),
            None => Ok(Vec::new()),
        }
    }

    /// Adds `record` to the end of the collection.
    ///
    /// Fails with [`StoreError::Conflict`] if any stored label equals the new
    /// one; the document is left untouched in that case.
    pub fn append(&self, record: CipherRecord) -> StoreResult<()> {
        let mut records = self.load()?;
        if records.iter().any(|r| r.label == record.label) {
            return Err(StoreError::Conflict(record.label.to_string()));
        }
        debug!(label = %record.label, "appending record");
        records.push(record);
        self.persist(&records)
    }

    /// Deletes the record carrying `label`.
    ///
    /// Fails with [`StoreError::Missing`] if the document was never written
    /// and [`StoreError::NotFound`] if no record matches.
    pub fn remove(&self, label: &str) -> StoreResult<()> {
        let records = self
            .read_existing()?
            .ok_or_else(|| StoreError::Missing(self.path.clone()))?;
        let before = records.len();
        let kept: Vec<CipherRecord> = records.into_iter().filter(|r| r.label != *label).collect();
        if kept.len() == before {
            return Err(StoreError::NotFound(label.to_string()));
        }
        debug!(label, "removing record");
        self.persist(&kept)
    }

    fn read_existing(&self) -> StoreResult<Option<Vec<CipherRecord>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Rewrites the whole document: temp file in the same directory, fsync,
    /// rename over the target.
    fn persist(&self, records: &[CipherRecord]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut staging = NamedTempFile::new_in(&dir)?;
        staging.write_all(&json)?;
        staging.as_file().sync_all()?;
        staging.persist(&self.path).map_err(|e| e.error)?;
        fsync_dir(&dir)?;

        debug!(path = %self.path.display(), records = records.len(), "store persisted");
        Ok(())
    }
}

/// Makes a rename inside `dir` durable.
fn fsync_dir(dir: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        fs::File::open(dir)?.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}
