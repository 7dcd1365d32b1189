//! In-memory implementation of InvoiceStore for testing and development

use crate::core::error::{DashboardResult, EntityError, StorageError};
use crate::core::invoice::{
    Customer, CustomerField, Invoice, InvoiceChanges, InvoiceForm, InvoiceRow, InvoiceStatus,
    NewInvoice,
};
use crate::core::service::InvoiceStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    customers: Vec<Customer>,
    /// Insertion order; the listing sorts by date on read
    invoices: Vec<Invoice>,
}

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryInvoiceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with the demo customers and invoices
    pub fn seeded() -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            tables.customers = seed::customers();
            tables.invoices = seed::invoices();
        }
        store
    }

    fn read(&self) -> DashboardResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| {
            StorageError::Unavailable {
                backend: "in-memory".to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> DashboardResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| {
            StorageError::Unavailable {
                backend: "in-memory".to_string(),
            }
            .into()
        })
    }

    pub fn add_customer(&self, customer: Customer) -> DashboardResult<()> {
        self.write()?.customers.push(customer);
        Ok(())
    }

    /// Insert a row with a caller-chosen id
    pub fn add_invoice(&self, invoice: Invoice) -> DashboardResult<()> {
        self.write()?.invoices.push(invoice);
        Ok(())
    }

    /// Full stored row, including the date
    pub fn get_invoice(&self, id: &str) -> DashboardResult<Option<Invoice>> {
        Ok(self.read()?.invoices.iter().find(|i| i.id == id).cloned())
    }

    pub fn invoice_count(&self) -> DashboardResult<usize> {
        Ok(self.read()?.invoices.len())
    }

    fn matching_rows(tables: &Tables, query: &str) -> Vec<InvoiceRow> {
        let needle = query.trim().to_lowercase();

        let mut rows: Vec<InvoiceRow> = tables
            .invoices
            .iter()
            .filter_map(|invoice| {
                let customer = tables.customers.iter().find(|c| c.id == invoice.customer_id)?;
                Some(InvoiceRow {
                    id: invoice.id.clone(),
                    amount: invoice.amount,
                    date: invoice.date,
                    status: invoice.status,
                    name: customer.name.clone(),
                    email: customer.email.clone(),
                    image_url: customer.image_url.clone(),
                })
            })
            .filter(|row| needle.is_empty() || Self::row_matches(row, &needle))
            .collect();

        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    fn row_matches(row: &InvoiceRow, needle: &str) -> bool {
        row.name.to_lowercase().contains(needle)
            || row.email.to_lowercase().contains(needle)
            || row.amount.to_string().contains(needle)
            || row.date.to_string().contains(needle)
            || row.status.as_str().contains(needle)
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn fetch_invoice_by_id(&self, id: &str) -> DashboardResult<Option<InvoiceForm>> {
        Ok(self.get_invoice(id)?.map(InvoiceForm::from))
    }

    async fn fetch_customers(&self) -> DashboardResult<Vec<CustomerField>> {
        let tables = self.read()?;
        let mut customers: Vec<CustomerField> =
            tables.customers.iter().map(CustomerField::from).collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> DashboardResult<Vec<InvoiceRow>> {
        let tables = self.read()?;
        Ok(Self::matching_rows(&tables, query)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_filtered_invoices(&self, query: &str) -> DashboardResult<u64> {
        let tables = self.read()?;
        Ok(Self::matching_rows(&tables, query).len() as u64)
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> DashboardResult<String> {
        let id = Uuid::new_v4().to_string();
        self.write()?.invoices.push(Invoice {
            id: id.clone(),
            customer_id: invoice.customer_id,
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        });
        Ok(id)
    }

    async fn update_invoice(&self, id: &str, changes: InvoiceChanges) -> DashboardResult<()> {
        let mut tables = self.write()?;
        let invoice = tables
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| EntityError::invoice_not_found(id))?;

        invoice.customer_id = changes.customer_id;
        invoice.amount = changes.amount;
        invoice.status = changes.status;
        Ok(())
    }

    async fn delete_invoice(&self, id: &str) -> DashboardResult<()> {
        let mut tables = self.write()?;
        let before = tables.invoices.len();
        tables.invoices.retain(|i| i.id != id);

        if tables.invoices.len() == before {
            return Err(EntityError::invoice_not_found(id).into());
        }
        Ok(())
    }
}

/// Demo data for the in-memory backend and the PostgreSQL seeder
pub mod seed {
    use super::*;

    fn customer(id: &str, name: &str, email: &str, image: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            image_url: format!("/customers/{}.png", image),
        }
    }

    fn invoice(id: &str, customer_id: &str, amount: i64, status: InvoiceStatus, date: &str) -> Invoice {
        Invoice {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            amount,
            status,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or_default(),
        }
    }

    pub fn customers() -> Vec<Customer> {
        vec![
            customer(
                "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
                "Evil Rabbit",
                "evil@rabbit.com",
                "evil-rabbit",
            ),
            customer(
                "3958dc9e-712f-4377-85e9-fec4b6a6442a",
                "Delba de Oliveira",
                "delba@oliveira.com",
                "delba-de-oliveira",
            ),
            customer(
                "3958dc9e-742f-4377-85e9-fec4b6a6442a",
                "Lee Robinson",
                "lee@robinson.com",
                "lee-robinson",
            ),
            customer(
                "76d65c26-f784-44a2-ac19-586678f7c2f2",
                "Michael Novotny",
                "michael@novotny.com",
                "michael-novotny",
            ),
            customer(
                "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
                "Amy Burns",
                "amy@burns.com",
                "amy-burns",
            ),
            customer(
                "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
                "Balazs Orban",
                "balazs@orban.com",
                "balazs-orban",
            ),
        ]
    }

    pub fn invoices() -> Vec<Invoice> {
        use InvoiceStatus::{Paid, Pending};
        let c = customers();
        let ids: Vec<&str> = c.iter().map(|c| c.id.as_str()).collect();

        vec![
            invoice("5d3c9a1e-0001-4c2b-9a55-1e3f4a6b7c01", ids[0], 15795, Pending, "2022-12-06"),
            invoice("5d3c9a1e-0002-4c2b-9a55-1e3f4a6b7c02", ids[1], 20348, Pending, "2022-11-14"),
            invoice("5d3c9a1e-0003-4c2b-9a55-1e3f4a6b7c03", ids[4], 3040, Paid, "2022-10-29"),
            invoice("5d3c9a1e-0004-4c2b-9a55-1e3f4a6b7c04", ids[3], 44800, Paid, "2023-09-10"),
            invoice("5d3c9a1e-0005-4c2b-9a55-1e3f4a6b7c05", ids[5], 34577, Pending, "2023-08-05"),
            invoice("5d3c9a1e-0006-4c2b-9a55-1e3f4a6b7c06", ids[2], 54246, Pending, "2023-07-16"),
            invoice("5d3c9a1e-0007-4c2b-9a55-1e3f4a6b7c07", ids[0], 666, Pending, "2023-06-27"),
            invoice("5d3c9a1e-0008-4c2b-9a55-1e3f4a6b7c08", ids[3], 32545, Paid, "2023-06-09"),
            invoice("5d3c9a1e-0009-4c2b-9a55-1e3f4a6b7c09", ids[4], 1250, Paid, "2023-06-17"),
            invoice("5d3c9a1e-0010-4c2b-9a55-1e3f4a6b7c10", ids[5], 8546, Paid, "2023-06-07"),
            invoice("5d3c9a1e-0011-4c2b-9a55-1e3f4a6b7c11", ids[1], 500, Paid, "2023-08-19"),
            invoice("5d3c9a1e-0012-4c2b-9a55-1e3f4a6b7c12", ids[5], 8945, Paid, "2023-06-03"),
            invoice("5d3c9a1e-0013-4c2b-9a55-1e3f4a6b7c13", ids[2], 1000, Paid, "2022-06-05"),
        ]
    }
}
