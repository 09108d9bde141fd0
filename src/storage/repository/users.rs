// SPDX-License-Identifier: AGPL-3.0-or-later

//! User repository.
//!
//! Users own payment records; deleting a user cascades to every payment
//! record that references it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStore, StorageError, StorageResult};
use super::PaymentRepository;
use crate::auth::Role;

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (sequence-allocated)
    pub id: u64,
    /// Display name
    pub name: String,
    /// Granted roles
    pub roles: Vec<Role>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Capability query: does this user hold the given role?
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a FileStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: u64) -> bool {
        self.store.exists(self.store.paths().user(user_id))
    }

    /// Get a user by id.
    pub fn get(&self, user_id: u64) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(user_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("user {user_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new user with the next free id.
    pub fn create(&self, name: &str, roles: Vec<Role>) -> StorageResult<StoredUser> {
        if name.trim().is_empty() {
            return Err(StorageError::Validation("name is required".to_string()));
        }

        let id = self.store.next_id(self.store.paths().users_dir())?;
        let user = StoredUser {
            id,
            name: name.to_string(),
            roles,
            created_at: Utc::now(),
        };
        self.store.write_json(self.store.paths().user(id), &user)?;
        Ok(user)
    }

    /// Delete a user and cascade to all of their payment records.
    ///
    /// Returns the number of payment records removed by the cascade.
    pub fn delete(&self, user_id: u64, payments: &PaymentRepository<'_>) -> StorageResult<usize> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("user {user_id}")));
        }

        let removed = payments.delete_by_user(user_id)?;
        self.store.delete(self.store.paths().user(user_id))?;
        Ok(removed)
    }
}
