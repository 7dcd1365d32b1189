//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresInvoiceStore`, an [`InvoiceStore`] backed by a
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoice-dashboard = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! - `customers (id UUID, name, email, image_url)`
//! - `invoices (id UUID, customer_id UUID, amount BIGINT, status, date DATE)`,
//!   with `amount > 0`, a known `status` and a foreign key to `customers`
//!
//! Identifiers travel as strings through the crate; a string that is not a
//! UUID cannot match any row, so it is treated as "no such row" instead of
//! being sent to the server.

use crate::core::error::{DashboardResult, EntityError, StorageError};
use crate::core::invoice::{
    Customer, CustomerField, InvoiceChanges, InvoiceForm, InvoiceRow, InvoiceStatus, NewInvoice,
    cents_to_dollars,
};
use crate::core::service::InvoiceStore;
use crate::storage::in_memory::seed;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const BACKEND: &str = "PostgreSQL";

// ---------------------------------------------------------------------------
// Connection & schema management
// ---------------------------------------------------------------------------

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> DashboardResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| {
            StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> DashboardResult<()> {
    // gen_random_uuid() is built in from PostgreSQL 13, pgcrypto before that
    sqlx::query("CREATE EXTENSION IF NOT EXISTS pgcrypto")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS customers (
            id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            image_url VARCHAR(255) NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
            customer_id UUID NOT NULL REFERENCES customers (id),
            amount BIGINT NOT NULL CHECK (amount > 0),
            status VARCHAR(255) NOT NULL CHECK (status IN ('pending', 'paid')),
            date DATE NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices (date DESC)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert the demo customers and invoices unless customers already exist.
pub async fn seed(pool: &PgPool) -> DashboardResult<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!(existing, "Skipping seed, customers already present");
        return Ok(());
    }

    for customer in seed::customers() {
        sqlx::query(
            "INSERT INTO customers (id, name, email, image_url) VALUES ($1::uuid, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.image_url)
        .execute(pool)
        .await?;
    }

    for invoice in seed::invoices() {
        sqlx::query(
            "INSERT INTO invoices (id, customer_id, amount, status, date) \
             VALUES ($1::uuid, $2::uuid, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&invoice.id)
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(pool)
        .await?;
    }

    tracing::info!("Seeded demo customers and invoices");
    Ok(())
}

fn parse_status(raw: &str) -> DashboardResult<InvoiceStatus> {
    raw.parse().map_err(|e: crate::core::invoice::UnknownStatus| {
        StorageError::IntegrityError {
            message: e.to_string(),
        }
        .into()
    })
}

fn is_uuid(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

// ---------------------------------------------------------------------------
// PostgresInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// let pool = dashboard::storage::postgres::connect("postgres://localhost/dashboard", 5).await?;
/// dashboard::storage::postgres::ensure_schema(&pool).await?;
/// let store = PostgresInvoiceStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    /// Create a new `PostgresInvoiceStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a customer; used by the seeder and tests
    pub async fn insert_customer(&self, customer: &Customer) -> DashboardResult<()> {
        sqlx::query(
            "INSERT INTO customers (id, name, email, image_url) VALUES ($1::uuid, $2, $3, $4)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.image_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// `$1` is the ILIKE pattern
const FILTER_CLAUSE: &str = "customers.name ILIKE $1 OR \
     customers.email ILIKE $1 OR \
     invoices.amount::text ILIKE $1 OR \
     invoices.date::text ILIKE $1 OR \
     invoices.status ILIKE $1";

fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    async fn fetch_invoice_by_id(&self, id: &str) -> DashboardResult<Option<InvoiceForm>> {
        if !is_uuid(id) {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, (String, String, i64, String)>(
            "SELECT id::text, customer_id::text, amount, status FROM invoices WHERE id = $1::uuid",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((id, customer_id, amount, status)) => Ok(Some(InvoiceForm {
                id,
                customer_id,
                amount: cents_to_dollars(amount),
                status: parse_status(&status)?,
            })),
            None => Ok(None),
        }
    }

    async fn fetch_customers(&self) -> DashboardResult<Vec<CustomerField>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT id::text, name FROM customers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CustomerField { id, name })
            .collect())
    }

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> DashboardResult<Vec<InvoiceRow>> {
        let sql = format!(
            "SELECT invoices.id::text, invoices.amount, invoices.date, invoices.status, \
                    customers.name, customers.email, customers.image_url \
             FROM invoices JOIN customers ON invoices.customer_id = customers.id \
             WHERE {} \
             ORDER BY invoices.date DESC \
             LIMIT $2 OFFSET $3",
            FILTER_CLAUSE
        );

        let rows = sqlx::query_as::<_, (String, i64, NaiveDate, String, String, String, String)>(
            &sql,
        )
        .bind(like_pattern(query))
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, amount, date, status, name, email, image_url)| {
                Ok(InvoiceRow {
                    id,
                    amount,
                    date,
                    status: parse_status(&status)?,
                    name,
                    email,
                    image_url,
                })
            })
            .collect()
    }

    async fn count_filtered_invoices(&self, query: &str) -> DashboardResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM invoices JOIN customers ON invoices.customer_id = customers.id \
             WHERE {}",
            FILTER_CLAUSE
        );

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> DashboardResult<String> {
        let (id,): (String,) = sqlx::query_as(
            "INSERT INTO invoices (customer_id, amount, status, date) \
             VALUES ($1::uuid, $2, $3, $4) RETURNING id::text",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_invoice(&self, id: &str, changes: InvoiceChanges) -> DashboardResult<()> {
        if !is_uuid(id) {
            return Err(EntityError::invoice_not_found(id).into());
        }

        let result = sqlx::query(
            "UPDATE invoices SET customer_id = $1::uuid, amount = $2, status = $3 \
             WHERE id = $4::uuid",
        )
        .bind(&changes.customer_id)
        .bind(changes.amount)
        .bind(changes.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EntityError::invoice_not_found(id).into());
        }
        Ok(())
    }

    async fn delete_invoice(&self, id: &str) -> DashboardResult<()> {
        if !is_uuid(id) {
            return Err(EntityError::invoice_not_found(id).into());
        }

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EntityError::invoice_not_found(id).into());
        }
        Ok(())
    }
}
