//! Mutation actions: create, update and delete invoices
//!
//! Each action validates its input, performs exactly one write, invalidates
//! the cached invoice listing and tells the caller where to go next.
//! Failures never escape as errors: validation problems and storage
//! failures both come back as a [`FormState`] for the form to display.
//!
//! ```text
//! form ──▶ validate ──✗──▶ FormState { errors, "Missing Fields..." }
//!              │
//!              ✓
//!              ▼
//!           write ──✗──▶ FormState { "Database Error..." }
//!              │
//!              ✓
//!              ▼
//!      invalidate(InvoiceList) ──▶ Redirect(/dashboard/invoices)
//! ```

pub mod rpc;

use crate::core::cache::{CacheTag, RenderCache};
use crate::core::invoice::{InvoiceChanges, NewInvoice, utc_today};
use crate::core::route::Route;
use crate::core::service::InvoiceStore;
use crate::core::validation::{FormData, FormState, validate_invoice_form};
use chrono::NaiveDate;
use std::sync::Arc;

/// The three mutations, used to name them in user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn verb(&self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }

    /// Summary shown when validation fails
    pub fn missing_fields_message(&self) -> String {
        format!("Missing Fields. Failed to {} Invoice.", self.verb())
    }

    /// Summary shown when the write fails
    pub fn database_error_message(&self) -> String {
        format!("Database Error: Failed to {} Invoice.", self.verb())
    }
}

pub const DELETED_MESSAGE: &str = "Deleted Invoice.";

/// What the caller should do after a create or update
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The write succeeded; navigate away. Carries no form state.
    Redirect(Route),
    /// Stay on the form and show this state
    State(FormState),
}

impl ActionOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, ActionOutcome::Redirect(_))
    }

    /// The form state, or the empty state after a redirect
    pub fn state(&self) -> FormState {
        match self {
            ActionOutcome::Redirect(_) => FormState::default(),
            ActionOutcome::State(state) => state.clone(),
        }
    }
}

/// Invoice mutations bound to a store and the render cache
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    cache: RenderCache,
    today: fn() -> NaiveDate,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, cache: RenderCache) -> Self {
        Self {
            store,
            cache,
            today: utc_today,
        }
    }

    /// Replace the clock used to stamp new invoices
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Validate and insert a new invoice dated today.
    ///
    /// The state the form last displayed is accepted but does not influence
    /// the outcome.
    pub async fn create_invoice(&self, _prev_state: &FormState, form: &FormData) -> ActionOutcome {
        let operation = Operation::Create;

        let input = match validate_invoice_form(form) {
            Ok(input) => input,
            Err(errors) => {
                tracing::warn!(?errors, "Rejected invoice creation");
                return ActionOutcome::State(FormState::rejected(
                    errors,
                    operation.missing_fields_message(),
                ));
            }
        };

        let invoice = NewInvoice {
            customer_id: input.customer_id,
            amount: input.amount_cents,
            status: input.status,
            date: (self.today)(),
        };

        match self.store.insert_invoice(invoice).await {
            Ok(id) => {
                tracing::info!(invoice_id = %id, "Invoice created");
                self.invalidate_listing();
                ActionOutcome::Redirect(Route::Invoices)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create invoice");
                ActionOutcome::State(FormState::message(operation.database_error_message()))
            }
        }
    }

    /// Validate and overwrite customer, amount and status of invoice `id`.
    /// The invoice date is left untouched.
    pub async fn update_invoice(
        &self,
        id: &str,
        _prev_state: &FormState,
        form: &FormData,
    ) -> ActionOutcome {
        let operation = Operation::Update;

        let input = match validate_invoice_form(form) {
            Ok(input) => input,
            Err(errors) => {
                tracing::warn!(invoice_id = id, ?errors, "Rejected invoice update");
                return ActionOutcome::State(FormState::rejected(
                    errors,
                    operation.missing_fields_message(),
                ));
            }
        };

        let changes = InvoiceChanges {
            customer_id: input.customer_id,
            amount: input.amount_cents,
            status: input.status,
        };

        match self.store.update_invoice(id, changes).await {
            Ok(()) => {
                tracing::info!(invoice_id = id, "Invoice updated");
                self.invalidate_listing();
                ActionOutcome::Redirect(Route::Invoices)
            }
            Err(e) => {
                tracing::error!(invoice_id = id, error = %e, "Failed to update invoice");
                ActionOutcome::State(FormState::message(operation.database_error_message()))
            }
        }
    }

    /// Remove invoice `id`. There is no redirect: the caller stays on the
    /// listing, which re-renders because the cache was invalidated.
    ///
    /// Deleting an id that matches no row reports the database error message.
    pub async fn delete_invoice(&self, id: &str) -> FormState {
        match self.store.delete_invoice(id).await {
            Ok(()) => {
                tracing::info!(invoice_id = id, "Invoice deleted");
                self.invalidate_listing();
                FormState::message(DELETED_MESSAGE)
            }
            Err(e) => {
                tracing::error!(invoice_id = id, error = %e, "Failed to delete invoice");
                FormState::message(Operation::Delete.database_error_message())
            }
        }
    }

    fn invalidate_listing(&self) {
        if let Err(e) = self.cache.invalidate(CacheTag::InvoiceList) {
            tracing::warn!(error = %e, "Failed to invalidate the invoice listing");
        }
    }
}
