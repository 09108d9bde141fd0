// SPDX-License-Identifier: AGPL-3.0-or-later

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for automatic JSON handling and
//! OpenAPI documentation.
//!
//! ## Sensitive Fields
//!
//! [`PaymentView`] is the only representation of a payment record that
//! crosses the API boundary, and it is built deliberately: `card_number` and
//! `cvv` do not exist on the type, so no serializer configuration can leak
//! them. The masked list row ([`PaymentRow`]) carries only the
//! `**** **** **** XXXX` display string.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::admin::{FormField, TableColumn};
use crate::auth::Role;
use crate::storage::{StoredPayment, StoredUser};

// =============================================================================
// Payment Models
// =============================================================================

/// Request to create a payment record.
///
/// Field values arrive exactly as the admin form submits them; the handlers
/// apply the input transforms (card-number space stripping, amount parsing)
/// before anything reaches storage.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Owning user
    pub user_id: u64,
    pub card_holder_name: String,
    /// Card number, possibly with mask grouping spaces
    pub card_number: String,
    /// Expiry in MM/YY format
    pub expiry_date: String,
    pub cvv: String,
    /// Decimal amount, e.g. "49.99"
    pub amount: String,
}

/// Request to update a payment record.
///
/// Omitting `card_number` or `cvv` keeps the stored (encrypted) value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub user_id: u64,
    pub card_holder_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    pub expiry_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    pub amount: String,
}

/// External projection of a payment record.
///
/// Deliberately excludes the sensitive fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaymentView {
    pub id: u64,
    pub user_id: u64,
    pub card_holder_name: String,
    /// Expiry in MM/YY format
    pub expiry_date: String,
    /// Decimal amount serialized as a string, e.g. "49.99"
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredPayment> for PaymentView {
    fn from(payment: &StoredPayment) -> Self {
        Self {
            id: payment.id,
            user_id: payment.user_id,
            card_holder_name: payment.card_holder_name.clone(),
            expiry_date: payment.expiry_date.clone(),
            amount: payment.amount,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

/// One row of the payment list table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaymentRow {
    pub id: u64,
    /// Owning user's display name
    pub user_name: String,
    pub card_holder_name: String,
    /// Masked card number (`**** **** **** XXXX`); absent when the stored
    /// ciphertext could not be recovered for this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    /// Amount formatted as USD currency, e.g. "$49.99"
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

/// The payment list: column description for the renderer plus the rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListPaymentsResponse {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<PaymentRow>,
}

/// The create form schema.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
}

/// The edit form schema together with the record being edited.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditFormResponse {
    pub fields: Vec<FormField>,
    pub record: PaymentView,
}

// =============================================================================
// User Models
// =============================================================================

/// Request to create a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    /// Granted roles; defaults to none (plain client)
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// External representation of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredUser> for UserResponse {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            roles: user.roles.clone(),
            created_at: user.created_at,
        }
    }
}
