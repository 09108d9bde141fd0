// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    admin::{ColumnFormat, FormField, TableColumn},
    auth::Role,
    models::{
        CreatePaymentRequest, CreateUserRequest, EditFormResponse, FormSchema,
        ListPaymentsResponse, PaymentRow, PaymentView, UpdatePaymentRequest, UserResponse,
    },
    state::AppState,
};

pub mod health;
pub mod payments;
pub mod users;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route(
            "/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route("/payments/create", get(payments::create_form))
        .route("/payments/{payment_id}/edit", get(payments::edit_form))
        .route(
            "/payments/{payment_id}",
            axum::routing::put(payments::update_payment).delete(payments::delete_payment),
        )
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route(
            "/users/{user_id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        payments::list_payments,
        payments::create_form,
        payments::create_payment,
        payments::edit_form,
        payments::update_payment,
        payments::delete_payment,
        users::create_user,
        users::get_current_user,
        users::get_user,
        users::delete_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            PaymentView,
            PaymentRow,
            ListPaymentsResponse,
            FormSchema,
            EditFormResponse,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            CreateUserRequest,
            UserResponse,
            Role,
            FormField,
            TableColumn,
            ColumnFormat,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Payments", description = "Payment record management"),
        (name = "Users", description = "User accounts and roles"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = AppState::for_tests();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
