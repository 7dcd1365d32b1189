//! Route table

use super::handlers::{
    create_invoice, create_invoice_page, delete_invoice, dispatch_action, edit_invoice_page,
    health_check, list_invoices, not_found, root, update_invoice,
};
use super::state::AppState;
use crate::actions::rpc::RPC_PATH;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the dashboard routes
///
/// - GET  /                               - redirect to the listing
/// - GET  /health, /healthz               - liveness
/// - GET  /dashboard/invoices             - listing (`?query=&page=`)
/// - GET  /dashboard/invoices/create      - create form
/// - POST /dashboard/invoices/create      - create action
/// - GET  /dashboard/invoices/{id}/edit   - edit form
/// - POST /dashboard/invoices/{id}/edit   - update action
/// - POST /dashboard/invoices/{id}/delete - delete action
/// - POST /rpc/actions                    - JSON action endpoint
///
/// Anything else renders the not-found view.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/dashboard/invoices", get(list_invoices))
        .route(
            "/dashboard/invoices/create",
            get(create_invoice_page).post(create_invoice),
        )
        .route(
            "/dashboard/invoices/{id}/edit",
            get(edit_invoice_page).post(update_invoice),
        )
        .route("/dashboard/invoices/{id}/delete", post(delete_invoice))
        .route(RPC_PATH, post(dispatch_action))
        .fallback(not_found)
        .with_state(state)
}

/// Merge extra routes in and attach request tracing.
pub fn finish(app: Router, custom_routes: Vec<Router>) -> Router {
    custom_routes
        .into_iter()
        .fold(app, |app, routes| app.merge(routes))
        .layer(TraceLayer::new_for_http())
}
