//! Invoice pages: listing, create form and edit form

use super::{PageError, Renderer};
use crate::core::cache::{CacheTag, RenderCache};
use crate::core::error::DashboardResult;
use crate::core::invoice::{
    CustomerField, InvoiceForm, InvoiceRow, InvoiceStatus, format_currency, format_date,
};
use crate::core::query::{ITEMS_PER_PAGE, ListQuery, PageItem, pagination, total_pages};
use crate::core::route::{Breadcrumb, Route};
use crate::core::service::InvoiceStore;
use crate::core::validation::{FormData, FormField, FormState};
use serde::Serialize;

// =============================================================================
// Form
// =============================================================================

/// Values shown in the inputs of the invoice form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormValues {
    pub customer_id: String,
    pub amount: String,
    pub status: String,
}

impl FormValues {
    /// Echo a submission back into the form after it was rejected
    pub fn submitted(form: &FormData) -> Self {
        let field = |field: FormField| form.get(field.name()).unwrap_or_default().to_string();
        Self {
            customer_id: field(FormField::CustomerId),
            amount: field(FormField::Amount),
            status: field(FormField::Status),
        }
    }
}

impl From<&InvoiceForm> for FormValues {
    fn from(invoice: &InvoiceForm) -> Self {
        Self {
            customer_id: invoice.customer_id.clone(),
            amount: invoice.amount.to_string(),
            status: invoice.status.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct FormErrorsView {
    customer_id: Vec<String>,
    amount: Vec<String>,
    status: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FormView<'a> {
    action: String,
    submit_label: &'static str,
    customers: &'a [CustomerField],
    statuses: [&'static str; 2],
    customer_id: &'a str,
    amount: &'a str,
    status: &'a str,
    errors: FormErrorsView,
    message: Option<&'a str>,
}

impl<'a> FormView<'a> {
    fn new(
        action: &Route,
        submit_label: &'static str,
        customers: &'a [CustomerField],
        values: &'a FormValues,
        state: &'a FormState,
    ) -> Self {
        let errors = |field| state.field_errors(field).to_vec();
        Self {
            action: action.path(),
            submit_label,
            customers,
            statuses: InvoiceStatus::ALL.map(|status| status.as_str()),
            customer_id: &values.customer_id,
            amount: &values.amount,
            status: &values.status,
            errors: FormErrorsView {
                customer_id: errors(FormField::CustomerId),
                amount: errors(FormField::Amount),
                status: errors(FormField::Status),
            },
            message: state.message.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct FormPageView<'a> {
    breadcrumbs: &'a [Breadcrumb],
    form: FormView<'a>,
}

// =============================================================================
// Create
// =============================================================================

/// `GET /dashboard/invoices/create`
#[derive(Debug, Clone)]
pub struct CreateInvoicePage {
    pub customers: Vec<CustomerField>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl CreateInvoicePage {
    pub async fn assemble(store: &dyn InvoiceStore) -> Result<Self, PageError> {
        let customers = store.fetch_customers().await?;
        Ok(Self {
            customers,
            breadcrumbs: vec![
                Breadcrumb::link("Invoices", &Route::Invoices),
                Breadcrumb::active("Create Invoice", &Route::CreateInvoice),
            ],
        })
    }

    pub fn render(
        &self,
        renderer: &Renderer,
        values: &FormValues,
        state: &FormState,
    ) -> DashboardResult<String> {
        renderer.render(
            "invoices/create.html",
            &FormPageView {
                breadcrumbs: &self.breadcrumbs,
                form: FormView::new(
                    &Route::CreateInvoice,
                    "Create Invoice",
                    &self.customers,
                    values,
                    state,
                ),
            },
        )
    }
}

// =============================================================================
// Edit
// =============================================================================

/// `GET /dashboard/invoices/{id}/edit`
///
/// ```text
/// Loading ──┬── invoice missing ──▶ NotFound (404 view)
///           └── both fetched ─────▶ Ready (form pre-populated)
/// ```
#[derive(Debug, Clone)]
pub struct EditInvoicePage {
    pub invoice: InvoiceForm,
    pub customers: Vec<CustomerField>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl EditInvoicePage {
    /// Fetch the invoice and the customer list concurrently.
    ///
    /// Both reads must succeed; the first failure aborts the page. A missing
    /// invoice yields [`PageError::NotFound`].
    pub async fn assemble(store: &dyn InvoiceStore, id: &str) -> Result<Self, PageError> {
        let (invoice, customers) =
            tokio::try_join!(store.fetch_invoice_by_id(id), store.fetch_customers())?;

        let Some(invoice) = invoice else {
            tracing::debug!(invoice_id = id, "Edit requested for a missing invoice");
            return Err(PageError::invoice_not_found());
        };

        let edit = Route::EditInvoice(id.to_string());
        Ok(Self {
            invoice,
            customers,
            breadcrumbs: vec![
                Breadcrumb::link("Invoices", &Route::Invoices),
                Breadcrumb::active("Edit Invoice", &edit),
            ],
        })
    }

    /// The form pre-populated with the stored values
    pub fn render(&self, renderer: &Renderer, state: &FormState) -> DashboardResult<String> {
        self.render_with(renderer, &FormValues::from(&self.invoice), state)
    }

    pub fn render_with(
        &self,
        renderer: &Renderer,
        values: &FormValues,
        state: &FormState,
    ) -> DashboardResult<String> {
        renderer.render(
            "invoices/edit.html",
            &FormPageView {
                breadcrumbs: &self.breadcrumbs,
                form: FormView::new(
                    &Route::EditInvoice(self.invoice.id.clone()),
                    "Edit Invoice",
                    &self.customers,
                    values,
                    state,
                ),
            },
        )
    }
}

// =============================================================================
// Listing
// =============================================================================

/// One page of `GET /dashboard/invoices`
#[derive(Debug, Clone)]
pub struct InvoiceListPage {
    pub rows: Vec<InvoiceRow>,
    pub query: ListQuery,
    pub total_pages: u32,
}

#[derive(Serialize)]
struct RowView<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    image_url: &'a str,
    amount: String,
    date: String,
    status: &'static str,
    edit_href: String,
    delete_href: String,
}

#[derive(Serialize)]
struct PageLink {
    label: String,
    href: Option<String>,
    current: bool,
}

#[derive(Serialize)]
struct TableView<'a> {
    rows: Vec<RowView<'a>>,
    pages: Vec<PageLink>,
    previous_href: Option<String>,
    next_href: Option<String>,
}

#[derive(Serialize)]
struct ListView<'a> {
    breadcrumbs: [Breadcrumb; 0],
    query: &'a str,
    message: Option<&'a str>,
    table: String,
}

impl InvoiceListPage {
    /// Fetch the rows of the requested page and the page count concurrently.
    pub async fn assemble(store: &dyn InvoiceStore, query: &ListQuery) -> DashboardResult<Self> {
        let search = query.search();
        let (rows, count) = tokio::try_join!(
            store.fetch_filtered_invoices(search, query.offset(), ITEMS_PER_PAGE),
            store.count_filtered_invoices(search)
        )?;

        Ok(Self {
            rows,
            query: query.clone(),
            total_pages: total_pages(count),
        })
    }

    /// The table and pagination fragment, the part that is cached
    pub fn render_table(&self, renderer: &Renderer) -> DashboardResult<String> {
        let current = self.query.page();

        let rows = self
            .rows
            .iter()
            .map(|row| RowView {
                id: &row.id,
                name: &row.name,
                email: &row.email,
                image_url: &row.image_url,
                amount: format_currency(row.amount),
                date: format_date(row.date),
                status: row.status.as_str(),
                edit_href: Route::EditInvoice(row.id.clone()).path(),
                delete_href: self.query.delete_href(&row.id),
            })
            .collect();

        let pages = pagination(current, self.total_pages)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(page) => PageLink {
                    label: page.to_string(),
                    href: Some(self.query.page_href(page)),
                    current: page == current,
                },
                PageItem::Ellipsis => PageLink {
                    label: "...".to_string(),
                    href: None,
                    current: false,
                },
            })
            .collect();

        let previous_href = (current > 1).then(|| self.query.page_href(current - 1));
        let next_href = (current < self.total_pages).then(|| self.query.page_href(current + 1));

        renderer.render(
            "invoices/table.html",
            &TableView {
                rows,
                pages,
                previous_href,
                next_href,
            },
        )
    }
}

/// Render the listing page, reusing the cached table when one exists.
///
/// `flash` is shown above the table and is never cached.
pub async fn invoices_page(
    store: &dyn InvoiceStore,
    cache: &RenderCache,
    renderer: &Renderer,
    query: &ListQuery,
    flash: Option<&str>,
) -> Result<String, PageError> {
    let table = cache
        .get_or_render(CacheTag::InvoiceList, &query.cache_key(), move || async move {
            InvoiceListPage::assemble(store, query)
                .await?
                .render_table(renderer)
        })
        .await?;

    let html = renderer.render(
        "invoices/list.html",
        &ListView {
            breadcrumbs: [],
            query: query.search(),
            message: flash,
            table,
        },
    )?;
    Ok(html)
}
