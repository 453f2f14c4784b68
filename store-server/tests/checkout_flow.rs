//! Checkout finalization integration tests
//!
//! Exercises the cart → transaction transition end to end against a real
//! SQLite database: totals, price freezing, atomicity, audit persistence
//! and the per-user concurrency guarantee.

mod common;

use std::sync::Arc;

use common::{ADMIN_ID, COFFEE, MILK, SHOPPER_ID, TestStore, WHISKY};
use store_server::AppError;
use store_server::db::repository::{product, transaction};

/// Draw that never triggers the random-sampling audit rule
const NO_SAMPLE: f64 = 0.99;

#[tokio::test]
async fn checkout_freezes_cart_into_transaction() {
    let store = TestStore::new().await;
    store.fill_cart(SHOPPER_ID, &[(MILK, 2), (COFFEE, 1)]).await;

    let response = store
        .checkout_service(NO_SAMPLE)
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect("checkout succeeds");

    // 2 * 2.49 + 19.99
    assert_eq!(response.transaction.total_amount, 24.97);
    assert_eq!(response.transaction.user_id, SHOPPER_ID);
    assert_eq!(response.transaction.items.len(), 2);
    assert!(!response.transaction.requires_audit);
    assert_eq!(response.transaction.audit_reason, None);

    // The stored artifact is a PNG data URL; the raw payload rides alongside
    let exit_pass = response.transaction.exit_pass.as_deref().expect("exit pass stored");
    assert!(exit_pass.starts_with("data:image/png;base64,"));
    assert!(store.signer.verify(&response.exit_pass_payload));
    assert_eq!(response.exit_pass_payload.tx, response.transaction.id);
    assert_eq!(response.exit_pass_payload.uid, SHOPPER_ID);
    assert_eq!(response.exit_pass_payload.amt, 24.97);

    // Cart cleared in the same unit
    assert!(store.cart_lines(SHOPPER_ID).await.is_empty());
}

#[tokio::test]
async fn item_snapshots_survive_catalog_price_changes() {
    let store = TestStore::new().await;
    store.fill_cart(SHOPPER_ID, &[(COFFEE, 1)]).await;

    let checkout = store.checkout_service(NO_SAMPLE);
    let first = checkout
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect("first checkout");

    // Catalog price changes after the fact
    product::set_price(&store.db, COFFEE, 25.99)
        .await
        .expect("update price");

    store.fill_cart(SHOPPER_ID, &[(COFFEE, 1)]).await;
    let second = checkout
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect("second checkout");

    // The old transaction keeps its frozen price; the new one sees the update
    let stored = transaction::detail(&store.db, first.transaction.id)
        .await
        .expect("reload first transaction");
    assert_eq!(stored.items[0].price_at_purchase, 19.99);
    assert_eq!(stored.total_amount, 19.99);
    assert_eq!(second.transaction.items[0].price_at_purchase, 25.99);
    assert_eq!(second.transaction.total_amount, 25.99);
}

#[tokio::test]
async fn empty_cart_checkout_fails_without_side_effects() {
    let store = TestStore::new().await;

    let err = store
        .checkout_service(NO_SAMPLE)
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect_err("empty cart is rejected");
    assert!(matches!(err, AppError::EmptyCart));

    // Nothing persisted
    let history = transaction::find_by_user(&store.db, SHOPPER_ID)
        .await
        .expect("read history");
    assert!(history.is_empty());
}

#[tokio::test]
async fn random_sampling_verdict_is_persisted() {
    let store = TestStore::new().await;
    store.fill_cart(SHOPPER_ID, &[(MILK, 1)]).await;

    // Draw below the sampling rate: rule 1 fires, nothing overwrites it
    let response = store
        .checkout_service(0.05)
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect("checkout succeeds");

    assert!(response.transaction.requires_audit);
    assert_eq!(
        response.transaction.audit_reason.as_deref(),
        Some("Random security check")
    );

    let stored = transaction::find_by_id(&store.db, response.transaction.id)
        .await
        .expect("reload")
        .expect("row exists");
    assert!(stored.requires_audit);
    assert_eq!(stored.audit_reason.as_deref(), Some("Random security check"));
}

#[tokio::test]
async fn high_value_total_is_flagged() {
    let store = TestStore::new().await;
    // 2 * 49.99 + 19.99 = 119.97, all quantities below the bulk threshold
    store.fill_cart(SHOPPER_ID, &[(WHISKY, 2), (COFFEE, 1)]).await;

    let response = store
        .checkout_service(NO_SAMPLE)
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect("checkout succeeds");

    assert!(response.transaction.requires_audit);
    assert_eq!(
        response.transaction.audit_reason.as_deref(),
        Some("High-value transaction")
    );
}

#[tokio::test]
async fn bulk_purchase_reason_wins_over_high_value() {
    let store = TestStore::new().await;
    // 5 * 49.99 = 249.95: both rule 2 and rule 3 match, rule 3 is last
    store.fill_cart(SHOPPER_ID, &[(WHISKY, 5)]).await;

    let response = store
        .checkout_service(0.0) // rule 1 matches too
        .finalize_checkout(SHOPPER_ID)
        .await
        .expect("checkout succeeds");

    assert!(response.transaction.requires_audit);
    assert_eq!(
        response.transaction.audit_reason.as_deref(),
        Some("Bulk purchase detected")
    );
}

#[tokio::test]
async fn concurrent_checkouts_freeze_the_cart_exactly_once() {
    let store = TestStore::new().await;
    store.fill_cart(SHOPPER_ID, &[(MILK, 2), (COFFEE, 1)]).await;

    let checkout = Arc::new(store.checkout_service(NO_SAMPLE));
    let a = tokio::spawn({
        let checkout = checkout.clone();
        async move { checkout.finalize_checkout(SHOPPER_ID).await }
    });
    let b = tokio::spawn({
        let checkout = checkout.clone();
        async move { checkout.finalize_checkout(SHOPPER_ID).await }
    });

    let (a, b) = (a.await.expect("task a"), b.await.expect("task b"));

    // Exactly one request wins; the loser observes an emptied cart
    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let failure = if a.is_err() { a } else { b };
    assert!(matches!(failure, Err(AppError::EmptyCart)));

    let history = transaction::find_by_user(&store.db, SHOPPER_ID)
        .await
        .expect("read history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total_amount, 24.97);
}

#[tokio::test]
async fn history_is_per_user_and_newest_first() {
    let store = TestStore::new().await;
    let checkout = store.checkout_service(NO_SAMPLE);

    store.fill_cart(SHOPPER_ID, &[(MILK, 1)]).await;
    let first = checkout.finalize_checkout(SHOPPER_ID).await.expect("first");
    // Distinct created_at timestamps (millisecond resolution)
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.fill_cart(SHOPPER_ID, &[(COFFEE, 1)]).await;
    let second = checkout.finalize_checkout(SHOPPER_ID).await.expect("second");

    let history = transaction::find_by_user(&store.db, SHOPPER_ID)
        .await
        .expect("read history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.transaction.id);
    assert_eq!(history[1].id, first.transaction.id);

    let other = transaction::find_by_user(&store.db, ADMIN_ID)
        .await
        .expect("read other history");
    assert!(other.is_empty());
}
