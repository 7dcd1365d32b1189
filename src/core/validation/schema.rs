//! Invoice form schema
//!
//! Raw form strings are coerced first (see [`coerce`](super::coerce)), then
//! the coerced struct is checked with `validator`. The outcome is a plain
//! `Result`: the typed input, or the per-field messages.

use super::coerce::{coerce_amount, parse_status, required_text};
use super::{FieldErrors, FormData, FormField};
use crate::core::invoice::{InvoiceStatus, dollars_to_cents};
use validator::Validate;

pub const CUSTOMER_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

/// A validated invoice submission
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    /// Dollars, as submitted
    pub amount: f64,
    /// `round(amount * 100)`, at least one cent
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

#[derive(Debug, Validate)]
struct CoercedInvoice {
    #[validate(length(min = 1, message = "Please select a customer."))]
    customer_id: String,

    #[validate(
        required(message = "Please enter an amount greater than $0."),
        range(exclusive_min = 0.0, message = "Please enter an amount greater than $0.")
    )]
    amount: Option<f64>,

    #[validate(required(message = "Please select an invoice status."))]
    status: Option<InvoiceStatus>,
}

impl CoercedInvoice {
    fn from_form(form: &FormData) -> Self {
        Self {
            customer_id: required_text(form.get(FormField::CustomerId.name())),
            amount: coerce_amount(form.get(FormField::Amount.name())),
            status: parse_status(form.get(FormField::Status.name())),
        }
    }
}

/// Validate a submitted invoice form. `id` and `date` are never read from
/// the form.
pub fn validate_invoice_form(form: &FormData) -> Result<InvoiceInput, FieldErrors> {
    let coerced = CoercedInvoice::from_form(form);
    let mut fields = FieldErrors::default();

    if let Err(errors) = coerced.validate() {
        for (name, errs) in errors.field_errors() {
            let Some(field) = FormField::from_struct_field(name.as_ref()) else {
                continue;
            };
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| field.default_message().to_string());
                fields.push(field, message);
            }
        }
    }

    // Sub-cent and oversized amounts pass the dollar range check but have
    // no storable cents value.
    let cents = coerced
        .amount
        .and_then(dollars_to_cents)
        .filter(|cents| *cents > 0);
    if cents.is_none() && fields.get(FormField::Amount).is_empty() {
        fields.push(FormField::Amount, AMOUNT_MESSAGE);
    }
    if coerced.status.is_none() && fields.get(FormField::Status).is_empty() {
        fields.push(FormField::Status, STATUS_MESSAGE);
    }

    match (coerced.amount, cents, coerced.status) {
        (Some(amount), Some(amount_cents), Some(status)) if fields.is_empty() => {
            Ok(InvoiceInput {
                customer_id: coerced.customer_id,
                amount,
                amount_cents,
                status,
            })
        }
        _ => Err(fields),
    }
}
