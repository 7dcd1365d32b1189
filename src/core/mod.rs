//! Core module containing the model, validation and storage contract

pub mod cache;
pub mod error;
pub mod invoice;
pub mod query;
pub mod route;
pub mod service;
pub mod validation;

pub use cache::{CacheTag, RenderCache};
pub use error::{DashboardError, DashboardResult};
pub use invoice::{
    Customer, CustomerField, Invoice, InvoiceChanges, InvoiceForm, InvoiceRow, InvoiceStatus,
    NewInvoice,
};
pub use query::{ITEMS_PER_PAGE, ListQuery, PageItem};
pub use route::{Breadcrumb, Route};
pub use service::InvoiceStore;
pub use validation::{FieldErrors, FormData, FormField, FormState};
