// SPDX-License-Identifier: AGPL-3.0-or-later

//! Declarative admin-resource description for payment records.
//!
//! A generic admin renderer consumes this configuration to draw the
//! create/edit form and the list table; the handlers apply the input
//! transforms at the submission boundary so rendering stays decoupled from
//! normalization.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// The "recent" list filter keeps records created within this many days.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// One input field of the payment create/edit form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormField {
    /// Field name as submitted
    pub name: &'static str,
    /// Label shown by the renderer
    pub label: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Input mask pattern, if any (`#` = digit group, `0` = digit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<&'static str>,
    pub numeric: bool,
    /// Display prefix, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'static str>,
}

/// One column of the payment list table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TableColumn {
    pub name: &'static str,
    pub label: &'static str,
    pub format: ColumnFormat,
}

/// How a table column renders its value.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    Text,
    MaskedCard,
    Money,
    DateTime,
}

/// The payment create/edit form schema.
pub fn payment_form() -> Vec<FormField> {
    vec![
        FormField {
            name: "card_holder_name",
            label: "Card Holder Name",
            required: true,
            max_length: Some(255),
            mask: None,
            numeric: false,
            prefix: None,
        },
        FormField {
            name: "card_number",
            label: "Card Number",
            required: true,
            max_length: None,
            mask: Some("#### #### #### ####"),
            numeric: false,
            prefix: None,
        },
        FormField {
            name: "expiry_date",
            label: "Expiry (MM/YY)",
            required: true,
            max_length: None,
            mask: Some("00/00"),
            numeric: false,
            prefix: None,
        },
        FormField {
            name: "cvv",
            label: "CVV",
            required: true,
            max_length: Some(4),
            mask: None,
            numeric: false,
            prefix: None,
        },
        FormField {
            name: "amount",
            label: "Amount",
            required: true,
            max_length: None,
            mask: None,
            numeric: true,
            prefix: Some("USD "),
        },
    ]
}

/// The payment list table schema.
pub fn payment_table() -> Vec<TableColumn> {
    vec![
        TableColumn {
            name: "user_name",
            label: "User",
            format: ColumnFormat::Text,
        },
        TableColumn {
            name: "card_holder_name",
            label: "Card Holder Name",
            format: ColumnFormat::Text,
        },
        TableColumn {
            name: "card_number",
            label: "Card Number",
            format: ColumnFormat::MaskedCard,
        },
        TableColumn {
            name: "amount",
            label: "Amount",
            format: ColumnFormat::Money,
        },
        TableColumn {
            name: "created_at",
            label: "Created At",
            format: ColumnFormat::DateTime,
        },
    ]
}

// ========== Input Transforms ==========

/// Strip the grouping spaces the card-number input mask inserts.
///
/// Applied at the form-submission boundary, before the value reaches the
/// payment repository.
pub fn strip_card_spaces(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ').collect()
}

// ========== Display Formatting ==========

/// Format an amount as USD currency with 2 fractional digits.
pub fn format_usd(amount: Decimal) -> String {
    let mut amount = amount;
    amount.rescale(2);
    format!("${amount}")
}

/// Cutoff instant for the "recent" filter.
pub fn recent_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_WINDOW_DAYS)
}
