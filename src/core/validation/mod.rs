//! Form validation
//!
//! A submission arrives as a flat mapping of field name to string
//! ([`FormData`]). [`validate_invoice_form`] turns it into a typed
//! [`InvoiceInput`] or a [`FieldErrors`] map; the actions wrap the latter in a
//! [`FormState`] that the form renders on the next round trip.

pub mod coerce;
pub mod schema;

pub use schema::{
    AMOUNT_MESSAGE, CUSTOMER_MESSAGE, InvoiceInput, STATUS_MESSAGE, validate_invoice_form,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw form fields exactly as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// Fields of the invoice form that can carry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    CustomerId,
    Amount,
    Status,
}

impl FormField {
    /// Name used by the HTML form and the JSON contract
    pub fn name(&self) -> &'static str {
        match self {
            FormField::CustomerId => "customerId",
            FormField::Amount => "amount",
            FormField::Status => "status",
        }
    }

    fn from_struct_field(name: &str) -> Option<Self> {
        match name {
            "customer_id" | "customerId" => Some(FormField::CustomerId),
            "amount" => Some(FormField::Amount),
            "status" => Some(FormField::Status),
            _ => None,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            FormField::CustomerId => CUSTOMER_MESSAGE,
            FormField::Amount => AMOUNT_MESSAGE,
            FormField::Status => STATUS_MESSAGE,
        }
    }
}

/// Per-field error messages, serialized as
/// `{ customerId?: [..], amount?: [..], status?: [..] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl FieldErrors {
    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        let slot = match field {
            FormField::CustomerId => &mut self.customer_id,
            FormField::Amount => &mut self.amount,
            FormField::Status => &mut self.status,
        };
        slot.get_or_insert_with(Vec::new).push(message.into());
    }

    pub fn get(&self, field: FormField) -> &[String] {
        let slot = match field {
            FormField::CustomerId => &self.customer_id,
            FormField::Amount => &self.amount,
            FormField::Status => &self.status,
        };
        slot.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.amount.is_none() && self.status.is_none()
    }
}

/// Outcome of one submission round trip, consumed by the form
///
/// The empty state is the initial state and the success state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FormState {
    pub fn rejected(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn field_errors(&self, field: FormField) -> &[String] {
        self.errors
            .as_ref()
            .map(|errors| errors.get(field))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_none() && self.message.is_none()
    }
}
