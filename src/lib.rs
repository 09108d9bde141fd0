// SPDX-License-Identifier: AGPL-3.0-or-later

//! Payments Admin Service
//!
//! This crate provides a CRUD admin service for payment card records with
//! field-level encryption at rest and a pure authorization policy gating
//! every record access.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `admin` - Declarative form/table description and input transforms
//! - `auth` - Roles, the payment policy, and the acting-user extractor
//! - `crypto` - AES-256-GCM field encryption
//! - `storage` - JSON file store and repositories

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
