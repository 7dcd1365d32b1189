//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use dashboard::core::error::{DashboardResult, StorageError};
use dashboard::core::{CustomerField, InvoiceForm, InvoiceRow, InvoiceStore};
use dashboard::core::invoice::{InvoiceChanges, NewInvoice};
use dashboard::storage::InMemoryInvoiceStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Customer ids from the seed data
pub const EVIL_RABBIT: &str = "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa";
pub const LEE_ROBINSON: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";

/// Invoice ids from the seed data
pub const FIRST_INVOICE: &str = "5d3c9a1e-0001-4c2b-9a55-1e3f4a6b7c01";
pub const NEWEST_INVOICE: &str = "5d3c9a1e-0004-4c2b-9a55-1e3f4a6b7c04";

pub const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// Seeded in-memory store whose individual operations can be made to fail
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryInvoiceStore,
    pub fail_customers: AtomicBool,
    pub fail_invoice_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub writes: AtomicUsize,
}

impl FlakyStore {
    pub fn seeded() -> Self {
        Self {
            inner: InMemoryInvoiceStore::seeded(),
            ..Self::default()
        }
    }

    pub fn failing_customers(self) -> Self {
        self.fail_customers.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_invoice_reads(self) -> Self {
        self.fail_invoice_reads.store(true, Ordering::SeqCst);
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn outage(flag: &AtomicBool) -> DashboardResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::ConnectionError {
                backend: "flaky".to_string(),
                message: "connection refused".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn write_attempt(&self) -> DashboardResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Self::outage(&self.fail_writes)
    }
}

#[async_trait]
impl InvoiceStore for FlakyStore {
    async fn fetch_invoice_by_id(&self, id: &str) -> DashboardResult<Option<InvoiceForm>> {
        Self::outage(&self.fail_invoice_reads)?;
        self.inner.fetch_invoice_by_id(id).await
    }

    async fn fetch_customers(&self) -> DashboardResult<Vec<CustomerField>> {
        Self::outage(&self.fail_customers)?;
        self.inner.fetch_customers().await
    }

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> DashboardResult<Vec<InvoiceRow>> {
        Self::outage(&self.fail_invoice_reads)?;
        self.inner.fetch_filtered_invoices(query, offset, limit).await
    }

    async fn count_filtered_invoices(&self, query: &str) -> DashboardResult<u64> {
        Self::outage(&self.fail_invoice_reads)?;
        self.inner.count_filtered_invoices(query).await
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> DashboardResult<String> {
        self.write_attempt()?;
        self.inner.insert_invoice(invoice).await
    }

    async fn update_invoice(&self, id: &str, changes: InvoiceChanges) -> DashboardResult<()> {
        self.write_attempt()?;
        self.inner.update_invoice(id, changes).await
    }

    async fn delete_invoice(&self, id: &str) -> DashboardResult<()> {
        self.write_attempt()?;
        self.inner.delete_invoice(id).await
    }
}
