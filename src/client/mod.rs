//! Typed client for the action endpoint
//!
//! Lets another process run the invoice actions without knowing the wire
//! format:
//!
//! ```rust,ignore
//! let client = ActionClient::new("http://127.0.0.1:3000");
//! let response = client.create_invoice(&FormState::default(), &form).await?;
//! assert_eq!(response.location(), Some("/dashboard/invoices"));
//! ```

use crate::actions::rpc::{ActionRequest, ActionResponse, RPC_PATH};
use crate::core::error::{DashboardResult, RequestError};
use crate::core::validation::{FormData, FormState};

#[derive(Debug, Clone)]
pub struct ActionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ActionClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), RPC_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one action and decode its outcome.
    pub async fn call(&self, request: &ActionRequest) -> DashboardResult<ActionResponse> {
        tracing::debug!(action = request.name(), endpoint = %self.endpoint, "Calling action");

        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Transport {
                message: format!("{} answered {}: {}", self.endpoint, status, body),
            }
            .into());
        }

        Ok(response.json::<ActionResponse>().await?)
    }

    pub async fn create_invoice(
        &self,
        prev_state: &FormState,
        form: &FormData,
    ) -> DashboardResult<ActionResponse> {
        self.call(&ActionRequest::CreateInvoice {
            prev_state: prev_state.clone(),
            form: form.clone(),
        })
        .await
    }

    pub async fn update_invoice(
        &self,
        id: &str,
        prev_state: &FormState,
        form: &FormData,
    ) -> DashboardResult<ActionResponse> {
        self.call(&ActionRequest::UpdateInvoice {
            id: id.to_string(),
            prev_state: prev_state.clone(),
            form: form.clone(),
        })
        .await
    }

    pub async fn delete_invoice(&self, id: &str) -> DashboardResult<ActionResponse> {
        self.call(&ActionRequest::DeleteInvoice { id: id.to_string() })
            .await
    }
}
