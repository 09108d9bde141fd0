// SPDX-License-Identifier: AGPL-3.0-or-later

//! Repositories over the JSON file store.

pub mod payments;
pub mod users;

pub use payments::{parse_amount, PaymentInput, PaymentRepository, StoredPayment};
pub use users::{StoredUser, UserRepository};
