//! Tera renderer over the templates compiled into the binary

use crate::core::error::DashboardResult;
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("error.html", include_str!("../../templates/error.html")),
    ("not_found.html", include_str!("../../templates/not_found.html")),
    (
        "invoices/form.html",
        include_str!("../../templates/invoices/form.html"),
    ),
    (
        "invoices/create.html",
        include_str!("../../templates/invoices/create.html"),
    ),
    (
        "invoices/edit.html",
        include_str!("../../templates/invoices/edit.html"),
    ),
    (
        "invoices/list.html",
        include_str!("../../templates/invoices/list.html"),
    ),
    (
        "invoices/table.html",
        include_str!("../../templates/invoices/table.html"),
    ),
];

/// Compiled page templates, shared between requests
#[derive(Clone)]
pub struct Renderer {
    tera: Arc<Tera>,
}

impl Renderer {
    pub fn new() -> DashboardResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render `template` with the fields of `view` as top-level variables.
    pub fn render<T: Serialize>(&self, template: &str, view: &T) -> DashboardResult<String> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(template, &context)?)
    }

    pub fn template_names(&self) -> Vec<&str> {
        self.tera.get_template_names().collect()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("templates", &self.template_names())
            .finish()
    }
}
