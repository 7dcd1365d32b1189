//! Behaviour of the create, update and delete actions against a store.

mod common;

use common::*;
use dashboard::actions::{ActionOutcome, InvoiceActions};
use dashboard::core::validation::{AMOUNT_MESSAGE, CUSTOMER_MESSAGE, STATUS_MESSAGE};
use dashboard::core::{
    CacheTag, Customer, FormData, FormField, FormState, Invoice, InvoiceStatus, InvoiceStore,
    RenderCache, Route,
};
use std::sync::Arc;

fn actions(store: Arc<FlakyStore>) -> (InvoiceActions, RenderCache) {
    let cache = RenderCache::new();
    let actions = InvoiceActions::new(store, cache.clone()).with_clock(fixed_today);
    (actions, cache)
}

fn warm(cache: &RenderCache) {
    cache.insert(CacheTag::InvoiceList, "query=&page=1", 0, "<table/>".to_string());
}

fn customer(id: &str, name: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        image_url: format!("/customers/{}.png", id),
    }
}

/// The single row of a store that started empty
async fn only_invoice(store: &FlakyStore) -> Invoice {
    let rows = store.inner.fetch_filtered_invoices("", 0, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    store.inner.get_invoice(&rows[0].id).unwrap().unwrap()
}

fn form(customer_id: &str, amount: &str, status: &str) -> FormData {
    FormData::new()
        .with("customerId", customer_id)
        .with("amount", amount)
        .with("status", status)
}

// =============================================================================
// Create
// =============================================================================

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_submission_inserts_and_redirects() {
        let store = Arc::new(FlakyStore::default());
        store.inner.add_customer(customer("c1", "Customer One")).unwrap();
        let (actions, cache) = actions(store.clone());
        warm(&cache);

        let outcome = actions
            .create_invoice(&FormState::default(), &form("c1", "45.50", "pending"))
            .await;

        assert_eq!(outcome, ActionOutcome::Redirect(Route::Invoices));
        assert_eq!(outcome.state(), FormState::default());
        assert!(cache.is_empty(CacheTag::InvoiceList));

        let stored = only_invoice(&store).await;
        assert_eq!(stored.customer_id, "c1");
        assert_eq!(stored.amount, 4550);
        assert_eq!(stored.status, InvoiceStatus::Pending);
        assert_eq!(stored.date, fixed_today());
    }

    #[tokio::test]
    async fn test_amount_is_rounded_to_cents() {
        for (amount, cents) in [("19.999", 2000), ("1e2", 10000), ("45.5", 4550)] {
            let store = Arc::new(FlakyStore::default());
            store.inner.add_customer(customer("c1", "Customer One")).unwrap();
            let (actions, _) = actions(store.clone());

            let outcome = actions
                .create_invoice(&FormState::default(), &form("c1", amount, "paid"))
                .await;

            assert!(outcome.is_redirect(), "amount {}", amount);
            assert_eq!(only_invoice(&store).await.amount, cents, "amount {}", amount);
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected_without_write() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, cache) = actions(store.clone());
        warm(&cache);

        for amount in ["0", "-5", "", "abc"] {
            let outcome = actions
                .create_invoice(&FormState::default(), &form(EVIL_RABBIT, amount, "paid"))
                .await;
            let state = outcome.state();

            assert!(!outcome.is_redirect(), "amount {:?}", amount);
            assert_eq!(state.field_errors(FormField::Amount), [AMOUNT_MESSAGE]);
            assert!(state.field_errors(FormField::CustomerId).is_empty());
            assert_eq!(
                state.message.as_deref(),
                Some("Missing Fields. Failed to Create Invoice.")
            );
        }

        assert_eq!(store.write_count(), 0);
        assert!(!cache.is_empty(CacheTag::InvoiceList));
    }

    #[tokio::test]
    async fn test_amounts_without_a_storable_cent_value_are_rejected() {
        let store = Arc::new(FlakyStore::seeded());
        let before = store.inner.invoice_count().unwrap();
        let (actions, cache) = actions(store.clone());
        warm(&cache);

        for amount in ["0.001", "0.004", "1e300", "10000000000.01"] {
            let outcome = actions
                .create_invoice(&FormState::default(), &form(LEE_ROBINSON, amount, "pending"))
                .await;
            let state = outcome.state();

            assert!(!outcome.is_redirect(), "amount {:?}", amount);
            assert_eq!(state.field_errors(FormField::Amount), [AMOUNT_MESSAGE]);
            assert_eq!(
                state.message.as_deref(),
                Some("Missing Fields. Failed to Create Invoice.")
            );
        }

        assert_eq!(store.write_count(), 0);
        assert_eq!(store.inner.invoice_count().unwrap(), before);
        assert!(!cache.is_empty(CacheTag::InvoiceList));
    }

    #[tokio::test]
    async fn test_largest_amount_is_accepted() {
        let store = Arc::new(FlakyStore::default());
        store.inner.add_customer(customer("c1", "Customer One")).unwrap();
        let (actions, _) = actions(store.clone());

        let outcome = actions
            .create_invoice(&FormState::default(), &form("c1", "10000000000", "paid"))
            .await;

        assert!(outcome.is_redirect());
        assert_eq!(only_invoice(&store).await.amount, 1_000_000_000_000);
    }

    #[tokio::test]
    async fn test_missing_customer_is_rejected() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());

        let missing = FormData::new().with("amount", "10").with("status", "paid");
        for submission in [missing, form("", "10", "paid"), form("   ", "10", "paid")] {
            let state = actions
                .create_invoice(&FormState::default(), &submission)
                .await
                .state();
            assert_eq!(state.field_errors(FormField::CustomerId), [CUSTOMER_MESSAGE]);
        }
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());

        for status in ["overdue", "Paid", ""] {
            let state = actions
                .create_invoice(&FormState::default(), &form(EVIL_RABBIT, "10", status))
                .await
                .state();
            assert_eq!(state.field_errors(FormField::Status), [STATUS_MESSAGE]);
        }

        let state = actions
            .create_invoice(
                &FormState::default(),
                &FormData::new().with("customerId", EVIL_RABBIT).with("amount", "10"),
            )
            .await
            .state();
        assert_eq!(state.field_errors(FormField::Status), [STATUS_MESSAGE]);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_customer_and_negative_amount_report_both_fields_only() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());

        let state = actions
            .create_invoice(&FormState::default(), &form("", "-5", "paid"))
            .await
            .state();
        let errors = state.errors.clone().unwrap();

        assert!(errors.customer_id.is_some());
        assert!(errors.amount.is_some());
        assert!(errors.status.is_none());
        assert_eq!(
            state.message.as_deref(),
            Some("Missing Fields. Failed to Create Invoice.")
        );
    }

    #[tokio::test]
    async fn test_storage_failure_reports_database_error() {
        let store = Arc::new(FlakyStore::seeded().failing_writes());
        let (actions, cache) = actions(store.clone());
        warm(&cache);

        let outcome = actions
            .create_invoice(&FormState::default(), &form(EVIL_RABBIT, "10", "paid"))
            .await;

        assert_eq!(
            outcome,
            ActionOutcome::State(FormState::message(
                "Database Error: Failed to Create Invoice."
            ))
        );
        assert!(!cache.is_empty(CacheTag::InvoiceList));
    }

    #[tokio::test]
    async fn test_previous_state_does_not_change_the_outcome() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());
        let previous = FormState::message("Missing Fields. Failed to Create Invoice.");

        let outcome = actions
            .create_invoice(&previous, &form(EVIL_RABBIT, "10", "paid"))
            .await;
        assert!(outcome.is_redirect());
    }
}

// =============================================================================
// Update
// =============================================================================

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_overwrites_fields_but_keeps_date() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, cache) = actions(store.clone());
        warm(&cache);
        let original = store.inner.get_invoice(FIRST_INVOICE).unwrap().unwrap();

        let outcome = actions
            .update_invoice(
                FIRST_INVOICE,
                &FormState::default(),
                &form(LEE_ROBINSON, "12.34", "paid"),
            )
            .await;

        assert_eq!(outcome, ActionOutcome::Redirect(Route::Invoices));
        let updated = store.inner.get_invoice(FIRST_INVOICE).unwrap().unwrap();
        assert_eq!(updated.customer_id, LEE_ROBINSON);
        assert_eq!(updated.amount, 1234);
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.date, original.date);
        assert!(cache.is_empty(CacheTag::InvoiceList));
    }

    #[tokio::test]
    async fn test_invalid_update_names_the_operation() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());

        let state = actions
            .update_invoice(FIRST_INVOICE, &FormState::default(), &form(EVIL_RABBIT, "0", "paid"))
            .await
            .state();

        assert_eq!(
            state.message.as_deref(),
            Some("Missing Fields. Failed to Update Invoice.")
        );
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_to_sub_cent_amount_keeps_stored_row() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());
        let original = store.inner.get_invoice(FIRST_INVOICE).unwrap().unwrap();

        let state = actions
            .update_invoice(FIRST_INVOICE, &FormState::default(), &form(EVIL_RABBIT, "0.004", "paid"))
            .await
            .state();

        assert_eq!(state.field_errors(FormField::Amount), [AMOUNT_MESSAGE]);
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.inner.get_invoice(FIRST_INVOICE).unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_of_missing_invoice_is_a_database_error() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());

        let outcome = actions
            .update_invoice(MISSING_ID, &FormState::default(), &form(EVIL_RABBIT, "10", "paid"))
            .await;

        assert_eq!(
            outcome.state().message.as_deref(),
            Some("Database Error: Failed to Update Invoice.")
        );
    }
}

// =============================================================================
// Delete
// =============================================================================

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_removes_row_and_invalidates_listing() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, cache) = actions(store.clone());
        warm(&cache);
        let before = store.inner.invoice_count().unwrap();

        let state = actions.delete_invoice(FIRST_INVOICE).await;

        assert_eq!(state, FormState::message("Deleted Invoice."));
        assert_eq!(store.inner.invoice_count().unwrap(), before - 1);
        assert!(store.inner.get_invoice(FIRST_INVOICE).unwrap().is_none());
        assert!(cache.is_empty(CacheTag::InvoiceList));
    }

    #[tokio::test]
    async fn test_delete_of_missing_id_reports_database_error() {
        let store = Arc::new(FlakyStore::seeded());
        let (actions, _) = actions(store.clone());
        let before = store.inner.invoice_count().unwrap();

        let state = actions.delete_invoice("not-an-invoice").await;

        assert_eq!(
            state.message.as_deref(),
            Some("Database Error: Failed to Delete Invoice.")
        );
        assert!(state.errors.is_none());
        assert_eq!(store.inner.invoice_count().unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_storage_failure_keeps_cache() {
        let store = Arc::new(FlakyStore::seeded().failing_writes());
        let (actions, cache) = actions(store.clone());
        warm(&cache);

        let state = actions.delete_invoice(FIRST_INVOICE).await;

        assert_eq!(
            state.message.as_deref(),
            Some("Database Error: Failed to Delete Invoice.")
        );
        assert!(!cache.is_empty(CacheTag::InvoiceList));
    }
}
