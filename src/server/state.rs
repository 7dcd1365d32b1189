//! Shared application state

use crate::actions::InvoiceActions;
use crate::core::cache::RenderCache;
use crate::core::service::InvoiceStore;
use crate::pages::Renderer;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub actions: InvoiceActions,
    pub cache: RenderCache,
    pub renderer: Renderer,
}

impl AppState {
    /// Wire the actions to the same store and cache the pages read from.
    pub fn new(store: Arc<dyn InvoiceStore>, cache: RenderCache, renderer: Renderer) -> Self {
        let actions = InvoiceActions::new(store.clone(), cache.clone());
        Self {
            store,
            actions,
            cache,
            renderer,
        }
    }

    pub fn with_actions(mut self, actions: InvoiceActions) -> Self {
        self.actions = actions;
        self
    }
}
