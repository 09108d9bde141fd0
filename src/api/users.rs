// SPDX-License-Identifier: AGPL-3.0-or-later

//! User endpoints.
//!
//! User management is admin-only except for reading your own account.
//! Deleting a user cascades to every payment record that user owns.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{Actor, Role},
    error::ApiError,
    models::{CreateUserRequest, UserResponse},
    state::AppState,
    storage::{PaymentRepository, UserRepository},
};

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 201, body = UserResponse),
        (status = 403, description = "Actor is not an admin")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if !actor.has_role(Role::Admin) {
        return Err(ApiError::forbidden("only admins may create users"));
    }

    let user = UserRepository::new(&state.store).create(&request.name, request.roles)?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = u64, Path, description = "User to fetch")),
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 403, description = "Actor may not view this user"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    Path(user_id): Path<u64>,
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<UserResponse>, ApiError> {
    if actor.id != user_id && !actor.has_role(Role::Admin) {
        return Err(ApiError::forbidden("you may only view your own account"));
    }

    let user = UserRepository::new(&state.store).get(user_id)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Get the acting user's own account.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Unknown acting user")
    )
)]
pub async fn get_current_user(Actor(actor): Actor) -> Json<UserResponse> {
    Json(UserResponse::from(&actor))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = u64, Path, description = "User to delete")),
    tag = "Users",
    responses(
        (status = 204, description = "User and all their payment records deleted"),
        (status = 403, description = "Actor is not an admin"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    Path(user_id): Path<u64>,
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<StatusCode, ApiError> {
    if !actor.has_role(Role::Admin) {
        return Err(ApiError::forbidden("only admins may delete users"));
    }

    let users = UserRepository::new(&state.store);
    let payments = PaymentRepository::new(&state.store, &state.cipher);
    let removed = users.delete(user_id, &payments)?;
    tracing::info!(user_id, cascaded_payments = removed, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
