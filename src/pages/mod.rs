//! Server-rendered dashboard pages
//!
//! Each page is assembled from the store, then rendered through
//! [`Renderer`]. Assembly failures are reported as a [`PageError`], which
//! distinguishes a missing invoice (the not-found view, HTTP 404) from any
//! other failure (the generic error view, HTTP 500).

pub mod invoices;
pub mod render;

pub use invoices::{
    CreateInvoicePage, EditInvoicePage, FormValues, InvoiceListPage, invoices_page,
};
pub use render::Renderer;

use crate::core::error::DashboardError;
use crate::core::route::{Breadcrumb, Route};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Why a page could not be shown
#[derive(Debug, Error)]
pub enum PageError {
    /// The requested record does not exist; carries what was looked for
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Any read or render failure while assembling the page
    #[error(transparent)]
    Failed(#[from] DashboardError),
}

impl PageError {
    pub fn invoice_not_found() -> Self {
        PageError::NotFound("invoice")
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the matching view. The not-found view takes precedence over
    /// the generic error view whenever the record is missing.
    pub fn render(self, renderer: &Renderer, retry_href: &str) -> Response {
        let status = self.status_code();
        let rendered = match &self {
            PageError::NotFound(what) => renderer.render(
                "not_found.html",
                &NotFoundView {
                    breadcrumbs: Vec::new(),
                    detail: format!("Could not find the requested {}.", what),
                },
            ),
            PageError::Failed(e) => {
                tracing::error!(error = %e, "Failed to assemble page");
                renderer.render(
                    "error.html",
                    &ErrorView {
                        breadcrumbs: Vec::new(),
                        code: e.error_code(),
                        retry_href: retry_href.to_string(),
                    },
                )
            }
        };

        match rendered {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                match self {
                    PageError::NotFound(_) => status.into_response(),
                    PageError::Failed(e) => e.into_response(),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct NotFoundView {
    breadcrumbs: Vec<Breadcrumb>,
    detail: String,
}

#[derive(Serialize)]
struct ErrorView {
    breadcrumbs: Vec<Breadcrumb>,
    code: &'static str,
    retry_href: String,
}

/// Body of the catch-all route for unknown paths
pub fn not_found_page(renderer: &Renderer) -> Response {
    PageError::NotFound("page").render(renderer, &Route::Invoices.path())
}
