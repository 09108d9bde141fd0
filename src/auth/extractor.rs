// SPDX-License-Identifier: AGPL-3.0-or-later

//! Axum extractor for the acting user.
//!
//! Use the `Actor` extractor in handlers to require an identified user:
//!
//! ```rust,ignore
//! async fn my_handler(Actor(user): Actor) -> impl IntoResponse {
//!     // user is a StoredUser
//! }
//! ```
//!
//! The acting user is supplied by the surrounding application through the
//! `x-acting-user` header carrying a user id. Token verification belongs to
//! that outer layer; this service only resolves the id against the user
//! repository and rejects unknown actors.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::{StoredUser, UserRepository};

/// Request header naming the acting user.
pub const ACTING_USER_HEADER: &str = "x-acting-user";

/// Extractor for the acting user.
#[derive(Debug)]
pub struct Actor(pub StoredUser);

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTING_USER_HEADER)
            .ok_or_else(|| ApiError::unauthorized(format!("{ACTING_USER_HEADER} header missing")))?
            .to_str()
            .map_err(|_| ApiError::unauthorized(format!("{ACTING_USER_HEADER} header invalid")))?;

        let user_id: u64 = header
            .trim()
            .parse()
            .map_err(|_| ApiError::unauthorized(format!("{ACTING_USER_HEADER} header invalid")))?;

        let user = UserRepository::new(&state.store)
            .get(user_id)
            .map_err(|_| ApiError::unauthorized(format!("unknown acting user {user_id}")))?;

        Ok(Actor(user))
    }
}
