//! ServerBuilder for fluent API to build the dashboard server

use super::router::{build_routes, finish};
use super::state::AppState;
use crate::core::cache::RenderCache;
use crate::core::service::InvoiceStore;
use crate::pages::Renderer;
use anyhow::Result;
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryInvoiceStore::seeded())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn InvoiceStore>>,
    cache: Option<RenderCache>,
    clock: Option<fn() -> NaiveDate>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            cache: None,
            clock: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice store (required)
    pub fn with_store(self, store: impl InvoiceStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set a store that is also held elsewhere, e.g. by a test
    pub fn with_shared_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Share a render cache instead of starting with an empty one
    pub fn with_cache(mut self, cache: RenderCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the clock that dates new invoices
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.clock = Some(today);
        self
    }

    /// Add routes outside the dashboard, merged before tracing is attached
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the state shared by every handler
    pub fn build_state(&mut self) -> Result<AppState> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("InvoiceStore is required. Call .with_store()"))?;
        let cache = self.cache.take().unwrap_or_default();
        let renderer = Renderer::new()?;

        let mut state = AppState::new(store, cache, renderer);
        if let Some(today) = self.clock {
            let actions = state.actions.clone().with_clock(today);
            state = state.with_actions(actions);
        }
        Ok(state)
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(finish(build_routes(state), custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::CacheTag;
    use crate::storage::InMemoryInvoiceStore;

    #[test]
    fn test_build_without_store_fails() {
        let result = ServerBuilder::new().build();
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("InvoiceStore is required"));
    }

    #[test]
    fn test_build_with_store() {
        assert!(
            ServerBuilder::new()
                .with_store(InMemoryInvoiceStore::new())
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_state_shares_the_given_cache() {
        let cache = RenderCache::new();
        let state = ServerBuilder::new()
            .with_store(InMemoryInvoiceStore::new())
            .with_cache(cache.clone())
            .build_state()
            .unwrap();

        cache.insert(CacheTag::InvoiceList, "k", 0, "html".to_string());
        assert_eq!(
            state.cache.get(CacheTag::InvoiceList, "k"),
            Some("html".to_string())
        );
        assert!(state.actions.cache().get(CacheTag::InvoiceList, "k").is_some());
    }
}
