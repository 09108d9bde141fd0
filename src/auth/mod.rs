// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Authorization Module
//!
//! Role definitions, the pure payment-record policy, and the axum extractor
//! resolving the acting user.
//!
//! Every payment view/update/delete handler resolves an [`Actor`] and runs
//! the matching [`policy`] predicate before touching storage.

pub mod extractor;
pub mod policy;
pub mod roles;

pub use extractor::{Actor, ACTING_USER_HEADER};
pub use roles::Role;
