// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Storage Module
//!
//! Persistent storage for payment records and users as JSON files under the
//! data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   payments/
//!     .seq              # id sequence
//!     {payment_id}.json # card_number/cvv fields are ciphertext
//!   users/
//!     .seq
//!     {user_id}.json
//! ```
//!
//! ## Security Model
//!
//! The files themselves are plaintext JSON, but the sensitive payment fields
//! inside them (`card_number`, `cvv`) are AES-256-GCM ciphertext produced by
//! [`crate::crypto::FieldCipher`] before any write. Decryption happens only
//! through the explicit repository accessors.

pub mod files;
pub mod paths;
pub mod repository;

pub use files::{FileStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    parse_amount, PaymentInput, PaymentRepository, StoredPayment, StoredUser, UserRepository,
};
