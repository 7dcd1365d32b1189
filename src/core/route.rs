//! Typed navigation targets

use serde::Serialize;
use std::fmt;

/// A page of the dashboard that can be linked to or redirected to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/dashboard/invoices`
    Invoices,
    /// `/dashboard/invoices/create`
    CreateInvoice,
    /// `/dashboard/invoices/{id}/edit`
    EditInvoice(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Invoices => "/dashboard/invoices".to_string(),
            Route::CreateInvoice => "/dashboard/invoices/create".to_string(),
            Route::EditInvoice(id) => format!("/dashboard/invoices/{}/edit", id),
        }
    }

    /// Form target that deletes invoice `id`
    pub fn delete_invoice(id: &str) -> String {
        format!("/dashboard/invoices/{}/delete", id)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// One entry of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
    pub active: bool,
}

impl Breadcrumb {
    pub fn link(label: &str, route: &Route) -> Self {
        Self {
            label: label.to_string(),
            href: route.path(),
            active: false,
        }
    }

    pub fn active(label: &str, route: &Route) -> Self {
        Self {
            active: true,
            ..Self::link(label, route)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Invoices.path(), "/dashboard/invoices");
        assert_eq!(Route::CreateInvoice.path(), "/dashboard/invoices/create");
        assert_eq!(
            Route::EditInvoice("abc".to_string()).to_string(),
            "/dashboard/invoices/abc/edit"
        );
        assert_eq!(Route::delete_invoice("abc"), "/dashboard/invoices/abc/delete");
    }

    #[test]
    fn test_active_breadcrumb() {
        let crumb = Breadcrumb::active("Edit Invoice", &Route::EditInvoice("1".to_string()));
        assert!(crumb.active);
        assert_eq!(crumb.href, "/dashboard/invoices/1/edit");
    }
}
