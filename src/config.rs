// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for payment storage | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `PAYMENT_ENCRYPTION_KEY` | Base64-encoded 32-byte AES-256-GCM key | Required |
//! | `SEED_ADMIN_USER` | Name of an admin user to create at startup | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the data directory path.
///
/// All payment records and users are stored as JSON files under this
/// directory. Card numbers and CVVs inside those files are ciphertext.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the field-encryption key.
///
/// Must decode (standard base64) to exactly 32 bytes. The same key must be
/// supplied across restarts or previously stored card data becomes
/// unrecoverable.
pub const ENCRYPTION_KEY_ENV: &str = "PAYMENT_ENCRYPTION_KEY";

/// Environment variable name for seeding an initial admin user.
pub const SEED_ADMIN_ENV: &str = "SEED_ADMIN_USER";

/// Environment variable name selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
