// SPDX-License-Identifier: AGPL-3.0-or-later

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

/// Base directory for all persistent storage.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Payment Paths ==========

    /// Directory containing all payment records.
    pub fn payments_dir(&self) -> PathBuf {
        self.root.join("payments")
    }

    /// Path to a specific payment record file.
    pub fn payment(&self, payment_id: u64) -> PathBuf {
        self.payments_dir().join(format!("{payment_id}.json"))
    }

    // ========== User Paths ==========

    /// Directory containing all users.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user file.
    pub fn user(&self, user_id: u64) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Id Sequences ==========

    /// Path to the id sequence file for a record directory.
    pub fn sequence(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(".seq")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_nest_under_root() {
        let paths = StoragePaths::new("/tmp/payments-test");
        assert_eq!(paths.payments_dir(), Path::new("/tmp/payments-test/payments"));
        assert_eq!(
            paths.payment(42),
            Path::new("/tmp/payments-test/payments/42.json")
        );
        assert_eq!(paths.user(7), Path::new("/tmp/payments-test/users/7.json"));
        assert_eq!(
            paths.sequence(paths.users_dir()),
            Path::new("/tmp/payments-test/users/.seq")
        );
    }
}
