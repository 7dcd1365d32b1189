//! Data access trait for invoices and customers

use crate::core::error::DashboardResult;
use crate::core::invoice::{CustomerField, InvoiceChanges, InvoiceForm, InvoiceRow, NewInvoice};
use async_trait::async_trait;

/// Storage behind the dashboard
///
/// Reads return `Ok(None)` / empty collections when nothing matches; only a
/// backend failure is an `Err`. Writes targeting a missing row fail with
/// [`EntityError::NotFound`](crate::core::error::EntityError::NotFound).
/// Each method is a single statement; there are no transactions.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Edit-form projection of one invoice, amount in dollars
    async fn fetch_invoice_by_id(&self, id: &str) -> DashboardResult<Option<InvoiceForm>>;

    /// Every customer as `{id, name}`, ordered by name
    async fn fetch_customers(&self) -> DashboardResult<Vec<CustomerField>>;

    /// One page of the listing, newest first
    ///
    /// `query` matches case-insensitively against customer name and email,
    /// the amount in cents, the date (`YYYY-MM-DD`) and the status.
    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> DashboardResult<Vec<InvoiceRow>>;

    /// Number of listing rows matching `query`
    async fn count_filtered_invoices(&self, query: &str) -> DashboardResult<u64>;

    /// Insert a new row and return its generated id
    async fn insert_invoice(&self, invoice: NewInvoice) -> DashboardResult<String>;

    /// Overwrite customer, amount and status of an existing row
    async fn update_invoice(&self, id: &str, changes: InvoiceChanges) -> DashboardResult<()>;

    /// Remove a row
    async fn delete_invoice(&self, id: &str) -> DashboardResult<()>;
}
