// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use crate::crypto::FieldCipher;
use crate::storage::FileStore;

/// Shared application state.
///
/// The file store takes `&self` for every operation and writes atomically, so
/// no in-process lock wraps it; concurrent writes to the same record resolve
/// at the storage layer (last write wins).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
    pub cipher: Arc<FieldCipher>,
}

impl AppState {
    pub fn new(store: FileStore, cipher: FieldCipher) -> Self {
        Self {
            store: Arc::new(store),
            cipher: Arc::new(cipher),
        }
    }

    /// Fresh state over a temp directory with a fixed test key.
    ///
    /// Keep the returned TempDir alive for the duration of the test.
    #[cfg(test)]
    pub fn for_tests() -> (Self, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let mut store = FileStore::new(crate::storage::StoragePaths::new(dir.path()));
        store.initialize().expect("initialize storage");
        (Self::new(store, FieldCipher::new(&[11u8; 32])), dir)
    }
}
