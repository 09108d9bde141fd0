// SPDX-License-Identifier: AGPL-3.0-or-later

//! Payment record endpoints.
//!
//! Every view/update/delete runs the matching [`policy`] predicate for the
//! acting user before touching storage; a `false` result is a 403, never a
//! silent filter.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    admin,
    auth::{policy, Actor, Role},
    error::ApiError,
    models::{
        CreatePaymentRequest, EditFormResponse, FormSchema, ListPaymentsResponse, PaymentRow,
        PaymentView, UpdatePaymentRequest,
    },
    state::AppState,
    storage::{parse_amount, PaymentInput, PaymentRepository, StoredPayment, UserRepository},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Built-in list filter; currently only `recent` (created within the
    /// last 7 days)
    pub filter: Option<String>,
}

fn payment_input(
    user_id: u64,
    card_holder_name: String,
    card_number: Option<String>,
    expiry_date: String,
    cvv: Option<String>,
    amount: &str,
) -> Result<PaymentInput, ApiError> {
    Ok(PaymentInput {
        user_id,
        card_holder_name,
        // Submission-boundary transform: drop the grouping spaces the card
        // input mask inserts.
        card_number: card_number.as_deref().map(admin::strip_card_spaces),
        expiry_date,
        cvv,
        amount: parse_amount(amount)?,
    })
}

fn display_row(
    repo: &PaymentRepository<'_>,
    users: &UserRepository<'_>,
    payment: &StoredPayment,
) -> PaymentRow {
    let user_name = users
        .get(payment.user_id)
        .map(|u| u.name)
        .unwrap_or_else(|_| "unknown".to_string());

    // An unrecoverable ciphertext degrades this row only; the rest of the
    // listing still renders.
    let card_number = match repo.masked_card_number(payment) {
        Ok(masked) => Some(masked),
        Err(e) => {
            tracing::warn!(
                payment_id = payment.id,
                error = %e,
                "card number could not be decrypted for display"
            );
            None
        }
    };

    PaymentRow {
        id: payment.id,
        user_name,
        card_holder_name: payment.card_holder_name.clone(),
        card_number,
        amount: admin::format_usd(payment.amount),
        created_at: payment.created_at,
    }
}

#[utoipa::path(
    get,
    path = "/payments",
    params(ListQuery),
    tag = "Payments",
    responses(
        (status = 200, body = ListPaymentsResponse),
        (status = 401, description = "Unknown acting user")
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListPaymentsResponse>, ApiError> {
    let repo = PaymentRepository::new(&state.store, &state.cipher);
    let users = UserRepository::new(&state.store);

    let admin_view = actor.has_role(Role::Admin);
    let mut payments = match params.filter.as_deref() {
        None => {
            if admin_view {
                repo.list_all()?
            } else {
                repo.list_by_user(actor.id)?
            }
        }
        Some("recent") => repo.list_created_since(admin::recent_cutoff(Utc::now()))?,
        Some(other) => {
            return Err(ApiError::bad_request(format!("unknown filter {other:?}")));
        }
    };
    if !admin_view {
        payments.retain(|p| p.user_id == actor.id);
    }

    let rows = payments
        .iter()
        .map(|payment| display_row(&repo, &users, payment))
        .collect();

    Ok(Json(ListPaymentsResponse {
        columns: admin::payment_table(),
        rows,
    }))
}

#[utoipa::path(
    get,
    path = "/payments/create",
    tag = "Payments",
    responses((status = 200, body = FormSchema))
)]
pub async fn create_form(Actor(_actor): Actor) -> Json<FormSchema> {
    Json(FormSchema {
        fields: admin::payment_form(),
    })
}

#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    tag = "Payments",
    responses(
        (status = 201, body = PaymentView),
        (status = 403, description = "Creating for another user without admin role"),
        (status = 422, description = "Missing or malformed field")
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentView>), ApiError> {
    if actor.id != request.user_id && !actor.has_role(Role::Admin) {
        return Err(ApiError::forbidden(
            "payment records can only be created for yourself",
        ));
    }

    let input = payment_input(
        request.user_id,
        request.card_holder_name,
        Some(request.card_number),
        request.expiry_date,
        Some(request.cvv),
        &request.amount,
    )?;

    let repo = PaymentRepository::new(&state.store, &state.cipher);
    let payment = repo.create(&input)?;
    Ok((StatusCode::CREATED, Json(PaymentView::from(&payment))))
}

#[utoipa::path(
    get,
    path = "/payments/{payment_id}/edit",
    params(("payment_id" = u64, Path, description = "Payment record to edit")),
    tag = "Payments",
    responses(
        (status = 200, body = EditFormResponse),
        (status = 403, description = "Actor may not view this record"),
        (status = 404, description = "No such payment record")
    )
)]
pub async fn edit_form(
    Path(payment_id): Path<u64>,
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<EditFormResponse>, ApiError> {
    let repo = PaymentRepository::new(&state.store, &state.cipher);
    let payment = repo.get(payment_id)?;

    if !policy::can_view(&actor, &payment) {
        return Err(ApiError::forbidden("you may not view this payment record"));
    }

    Ok(Json(EditFormResponse {
        fields: admin::payment_form(),
        record: PaymentView::from(&payment),
    }))
}

#[utoipa::path(
    put,
    path = "/payments/{payment_id}",
    params(("payment_id" = u64, Path, description = "Payment record to update")),
    request_body = UpdatePaymentRequest,
    tag = "Payments",
    responses(
        (status = 200, body = PaymentView),
        (status = 403, description = "Actor may not update this record"),
        (status = 404, description = "No such payment record"),
        (status = 422, description = "Missing or malformed field")
    )
)]
pub async fn update_payment(
    Path(payment_id): Path<u64>,
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<PaymentView>, ApiError> {
    let repo = PaymentRepository::new(&state.store, &state.cipher);
    let payment = repo.get(payment_id)?;

    if !policy::can_update(&actor, &payment) {
        return Err(ApiError::forbidden("only the owner may update this payment record"));
    }
    if request.user_id != payment.user_id && !actor.has_role(Role::Admin) {
        return Err(ApiError::forbidden("only admins may reassign a payment record"));
    }

    let input = payment_input(
        request.user_id,
        request.card_holder_name,
        request.card_number,
        request.expiry_date,
        request.cvv,
        &request.amount,
    )?;

    let updated = repo.update(payment_id, &input)?;
    Ok(Json(PaymentView::from(&updated)))
}

#[utoipa::path(
    delete,
    path = "/payments/{payment_id}",
    params(("payment_id" = u64, Path, description = "Payment record to delete")),
    tag = "Payments",
    responses(
        (status = 204),
        (status = 403, description = "Actor is not an admin"),
        (status = 404, description = "No such payment record")
    )
)]
pub async fn delete_payment(
    Path(payment_id): Path<u64>,
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<StatusCode, ApiError> {
    let repo = PaymentRepository::new(&state.store, &state.cipher);
    let payment = repo.get(payment_id)?;

    if !policy::can_delete(&actor, &payment) {
        return Err(ApiError::forbidden("only admins may delete payment records"));
    }

    repo.delete(payment_id)?;
    Ok(StatusCode::NO_CONTENT)
}
