// SPDX-License-Identifier: AGPL-3.0-or-later

//! Filesystem-backed JSON store.
//!
//! Each record is a single JSON file; writes go through a temp file and an
//! atomic rename. Concurrent mutations of the same record resolve to
//! last-write-wins; the only in-process coordination is the id-sequence lock.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::StoragePaths;
use crate::crypto::CryptoError;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("not found: {0}")]
    NotFound(String),
    /// Entity already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// Storage not initialized
    #[error("storage not initialized")]
    NotInitialized,
    /// A required field is missing or malformed
    #[error("{0}")]
    Validation(String),
    /// Field encryption or decryption failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON file store for payment records and users.
#[derive(Debug)]
pub struct FileStore {
    paths: StoragePaths,
    initialized: bool,
    // Serializes id allocation within this process. Cross-process ordering is
    // the deployment's problem, matching the single-writer assumption.
    seq_lock: Mutex<()>,
}

impl FileStore {
    /// Create a new FileStore.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
            seq_lock: Mutex::new(()),
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Initialize the storage directory structure.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [self.paths.payments_dir(), self.paths.users_dir()];
        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Check that the data directory is writable.
    ///
    /// Performs a write-read-delete round trip.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let test_file = self.paths.root().join(".health_check");
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::Io(io::Error::other(
                "health check data mismatch",
            )));
        }

        Ok(())
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List the ids of all files with the given extension in a directory.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }

        Ok(ids)
    }

    // ========== Id Sequences ==========

    /// Allocate the next id for a record directory.
    ///
    /// Ids are monotonically increasing per directory, persisted in a `.seq`
    /// file so they survive restarts and are never reused after deletes.
    pub fn next_id(&self, dir: impl AsRef<Path>) -> StorageResult<u64> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let _guard = self.seq_lock.lock().unwrap_or_else(|e| e.into_inner());

        let seq_path = self.paths.sequence(dir);
        let current: u64 = match fs::read_to_string(&seq_path) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                // Never fall back to 0 here: restarting the sequence would
                // re-allocate live ids and overwrite existing records.
                StorageError::Io(io::Error::other(format!(
                    "sequence file {} is corrupted",
                    seq_path.display()
                )))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        let next = current + 1;
        let temp_path = seq_path.with_extension("tmp");
        fs::write(&temp_path, next.to_string())?;
        fs::rename(&temp_path, &seq_path)?;
        Ok(next)
    }
}
