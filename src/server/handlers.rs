//! HTTP handlers
//!
//! HTML routes answer with rendered pages or a `303 See Other` redirect.
//! The action endpoint answers with JSON.

use super::state::AppState;
use crate::actions::ActionOutcome;
use crate::actions::rpc::{self, ActionRequest, ActionResponse};
use crate::core::error::{DashboardError, RequestError};
use crate::core::query::ListQuery;
use crate::core::route::Route;
use crate::core::validation::{FormData, FormState};
use crate::pages::{
    CreateInvoicePage, EditInvoicePage, FormValues, PageError, invoices_page, not_found_page,
};
use axum::{
    Form, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};

fn page(state: &AppState, result: Result<String, PageError>, retry: &Route) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.render(&state.renderer, &retry.path()),
    }
}

fn redirect(route: &Route) -> Response {
    Redirect::to(&route.path()).into_response()
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-dashboard"
    }))
}

pub async fn root() -> Response {
    redirect(&Route::Invoices)
}

/// `GET /dashboard/invoices?query=&page=`
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = invoices_page(
        state.store.as_ref(),
        &state.cache,
        &state.renderer,
        &query,
        None,
    )
    .await;
    page(&state, result, &Route::Invoices)
}

/// `GET /dashboard/invoices/create`
pub async fn create_invoice_page(State(state): State<AppState>) -> Response {
    let result: Result<String, PageError> = async {
        let view = CreateInvoicePage::assemble(state.store.as_ref()).await?;
        Ok(view.render(&state.renderer, &FormValues::default(), &FormState::default())?)
    }
    .await;
    page(&state, result, &Route::CreateInvoice)
}

/// `POST /dashboard/invoices/create`
pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<FormData>,
) -> Response {
    let form_state = match state
        .actions
        .create_invoice(&FormState::default(), &form)
        .await
    {
        ActionOutcome::Redirect(route) => return redirect(&route),
        ActionOutcome::State(form_state) => form_state,
    };

    let result: Result<String, PageError> = async {
        let view = CreateInvoicePage::assemble(state.store.as_ref()).await?;
        Ok(view.render(&state.renderer, &FormValues::submitted(&form), &form_state)?)
    }
    .await;
    page(&state, result, &Route::CreateInvoice)
}

/// `GET /dashboard/invoices/{id}/edit`
pub async fn edit_invoice_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result: Result<String, PageError> = async {
        let view = EditInvoicePage::assemble(state.store.as_ref(), &id).await?;
        Ok(view.render(&state.renderer, &FormState::default())?)
    }
    .await;
    page(&state, result, &Route::EditInvoice(id))
}

/// `POST /dashboard/invoices/{id}/edit`
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FormData>,
) -> Response {
    let form_state = match state
        .actions
        .update_invoice(&id, &FormState::default(), &form)
        .await
    {
        ActionOutcome::Redirect(route) => return redirect(&route),
        ActionOutcome::State(form_state) => form_state,
    };

    let result: Result<String, PageError> = async {
        let view = EditInvoicePage::assemble(state.store.as_ref(), &id).await?;
        Ok(view.render_with(&state.renderer, &FormValues::submitted(&form), &form_state)?)
    }
    .await;
    page(&state, result, &Route::EditInvoice(id))
}

/// `POST /dashboard/invoices/{id}/delete?query=&page=`
///
/// Answers with the listing the delete was issued from, re-rendered with the
/// outcome message.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let form_state = state.actions.delete_invoice(&id).await;

    let result = invoices_page(
        state.store.as_ref(),
        &state.cache,
        &state.renderer,
        &query,
        form_state.message.as_deref(),
    )
    .await;
    page(&state, result, &Route::Invoices)
}

/// `POST /rpc/actions`
pub async fn dispatch_action(
    State(state): State<AppState>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, DashboardError> {
    let Json(request) = payload.map_err(|rejection| RequestError::InvalidBody {
        message: rejection.body_text(),
    })?;

    Ok(Json(rpc::dispatch(&state.actions, request).await))
}

/// Fallback for every unknown path
pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_page(&state.renderer)
}
