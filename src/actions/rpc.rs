//! Remote invocation of the mutation actions
//!
//! The actions are exposed as a fixed set of named operations behind a
//! single endpoint. Requests and responses are JSON, tagged by name:
//!
//! ```text
//! POST /rpc/actions
//! { "action": "createInvoice", "form": { "customerId": "c1", "amount": "45.50", "status": "pending" } }
//!
//! 200 { "outcome": "redirect", "location": "/dashboard/invoices" }
//! 200 { "outcome": "state", "state": { "errors": { "amount": ["..."] }, "message": "..." } }
//! ```

use super::{ActionOutcome, InvoiceActions};
use crate::core::validation::{FormData, FormState};
use serde::{Deserialize, Serialize};

/// Path of the action endpoint
pub const RPC_PATH: &str = "/rpc/actions";

/// A call to one of the registered actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionRequest {
    CreateInvoice {
        #[serde(default)]
        prev_state: FormState,
        #[serde(default)]
        form: FormData,
    },
    UpdateInvoice {
        id: String,
        #[serde(default)]
        prev_state: FormState,
        #[serde(default)]
        form: FormData,
    },
    DeleteInvoice {
        id: String,
    },
}

impl ActionRequest {
    /// Registered names, in declaration order
    pub const NAMES: [&'static str; 3] = ["createInvoice", "updateInvoice", "deleteInvoice"];

    pub fn name(&self) -> &'static str {
        match self {
            ActionRequest::CreateInvoice { .. } => Self::NAMES[0],
            ActionRequest::UpdateInvoice { .. } => Self::NAMES[1],
            ActionRequest::DeleteInvoice { .. } => Self::NAMES[2],
        }
    }
}

/// Result of an action call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionResponse {
    /// Navigate to `location`
    Redirect { location: String },
    /// Show `state` on the form
    State { state: FormState },
}

impl ActionResponse {
    pub fn location(&self) -> Option<&str> {
        match self {
            ActionResponse::Redirect { location } => Some(location),
            ActionResponse::State { .. } => None,
        }
    }

    pub fn state(&self) -> Option<&FormState> {
        match self {
            ActionResponse::Redirect { .. } => None,
            ActionResponse::State { state } => Some(state),
        }
    }
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Redirect(route) => ActionResponse::Redirect {
                location: route.path(),
            },
            ActionOutcome::State(state) => ActionResponse::State { state },
        }
    }
}

/// Run the requested action.
pub async fn dispatch(actions: &InvoiceActions, request: ActionRequest) -> ActionResponse {
    tracing::debug!(action = request.name(), "Dispatching action");

    match request {
        ActionRequest::CreateInvoice { prev_state, form } => {
            actions.create_invoice(&prev_state, &form).await.into()
        }
        ActionRequest::UpdateInvoice {
            id,
            prev_state,
            form,
        } => actions.update_invoice(&id, &prev_state, &form).await.into(),
        ActionRequest::DeleteInvoice { id } => ActionResponse::State {
            state: actions.delete_invoice(&id).await,
        },
    }
}
