//! # Invoice Dashboard
//!
//! A server-rendered dashboard for managing invoices.
//!
//! ## Features
//!
//! - **Validated Actions**: create, update and delete invoices through a
//!   single validation schema, with per-field messages fed back to the form
//! - **Typed Invalidation**: every write drops the cached listing by
//!   [`CacheTag`](core::CacheTag), never by URL
//! - **Concurrent Page Assembly**: the edit page loads the invoice and the
//!   customer list in parallel and fails fast
//! - **Pluggable Storage**: in-memory (default) or PostgreSQL (`postgres`
//!   feature) behind the [`InvoiceStore`](core::InvoiceStore) trait
//! - **Action Endpoint**: `POST /rpc/actions` plus a typed client
//!   (`client` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryInvoiceStore::seeded())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod actions;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod core;
pub mod pages;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Breadcrumb, CacheTag, CustomerField, DashboardError, DashboardResult, FieldErrors,
        FormData, FormField, FormState, Invoice, InvoiceForm, InvoiceRow, InvoiceStatus,
        InvoiceStore, ListQuery, RenderCache, Route,
    };

    // === Actions ===
    pub use crate::actions::rpc::{ActionRequest, ActionResponse};
    pub use crate::actions::{ActionOutcome, InvoiceActions};

    // === Pages ===
    pub use crate::pages::{EditInvoicePage, PageError};

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;

    // === Config ===
    pub use crate::config::{DashboardConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === Client ===
    #[cfg(feature = "client")]
    pub use crate::client::ActionClient;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
