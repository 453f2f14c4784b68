//! Checkout Orchestrator
//!
//! Owns the cart → transaction state transition. The whole transition is
//! one atomic unit: transaction row, item snapshots, audit verdict,
//! exit-pass artifact and cart clearing all commit together or not at all.
//!
//! Checkouts are serialized per user so two concurrent requests cannot both
//! freeze the same cart lines; the loser of the race observes an empty cart
//! and fails with `EmptyCart` instead of double-charging.

use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use shared::models::{CheckoutResponse, Transaction, TransactionItem};
use shared::util::{now_millis, snowflake_id};

use crate::db::repository::{cart, transaction};
use crate::services::audit::{AuditPolicy, UniformSource};
use crate::services::exit_pass::{ExitPassSigner, render_exit_pass};
use crate::utils::money::{cart_total, to_f64};
use crate::utils::{AppError, AppResult};

pub struct CheckoutService {
    db: SqlitePool,
    signer: Arc<ExitPassSigner>,
    policy: AuditPolicy,
    entropy: Arc<dyn UniformSource>,
    /// Per-user checkout serialization
    cart_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl CheckoutService {
    pub fn new(db: SqlitePool, signer: Arc<ExitPassSigner>, entropy: Arc<dyn UniformSource>) -> Self {
        Self {
            db,
            signer,
            policy: AuditPolicy,
            entropy,
            cart_locks: DashMap::new(),
        }
    }

    /// Freeze the caller's cart into an immutable transaction.
    ///
    /// Returns the persisted transaction detail together with the raw
    /// signed payload (the stored QR image encodes the same text).
    pub async fn finalize_checkout(&self, user_id: i64) -> AppResult<CheckoutResponse> {
        // Serialize the cart→transaction transition per user. The dashmap
        // entry guard must not be held across an await point.
        let lock = self
            .cart_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = {
            let _guard = lock.lock().await;
            self.finalize_under_lock(user_id).await
        };
        drop(lock);

        // Evict the entry once only the map holds the lock; remove_if runs
        // under the shard write lock, so the count cannot change underneath.
        self.cart_locks
            .remove_if(&user_id, |_, l| Arc::strong_count(l) == 1);

        result
    }

    async fn finalize_under_lock(&self, user_id: i64) -> AppResult<CheckoutResponse> {
        let mut db_tx = self.db.begin().await?;

        let lines = cart::items_with_price(&mut *db_tx, user_id).await?;
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let total_dec = cart_total(&lines);
        let total_amount = to_f64(total_dec);
        let transaction_id = snowflake_id();

        let record = Transaction {
            id: transaction_id,
            user_id,
            total_amount,
            created_at: now_millis(),
            payment_ref: None,
            requires_audit: false,
            audit_reason: None,
            exit_pass: None,
        };
        transaction::insert(&mut *db_tx, &record).await?;

        // Freeze the current catalog price into each item snapshot
        for line in &lines {
            let item = TransactionItem {
                id: snowflake_id(),
                transaction_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_purchase: line.price,
            };
            transaction::insert_item(&mut *db_tx, &item).await?;
        }

        // Audit verdict, set exactly once during this unit
        let quantities: Vec<i64> = lines.iter().map(|line| line.quantity).collect();
        let decision = self
            .policy
            .evaluate(self.entropy.as_ref(), total_dec, &quantities);
        transaction::set_audit(
            &mut *db_tx,
            transaction_id,
            decision.requires_audit,
            decision.reason,
        )
        .await?;

        // Signed exit pass + rendered artifact, set exactly once
        let payload = self.signer.issue(transaction_id, user_id, total_amount);
        let payload_text = payload
            .encode()
            .map_err(|e| AppError::internal(format!("Payload serialization failed: {e}")))?;
        let exit_pass = render_exit_pass(&payload_text)?;
        transaction::set_exit_pass(&mut *db_tx, transaction_id, &exit_pass).await?;

        cart::clear(&mut *db_tx, user_id).await?;

        // Everything above lands together or not at all
        db_tx.commit().await?;

        tracing::info!(
            transaction_id,
            user_id,
            total_amount,
            requires_audit = decision.requires_audit,
            "Checkout finalized"
        );

        let detail = transaction::detail(&self.db, transaction_id).await?;
        Ok(CheckoutResponse {
            transaction: detail,
            exit_pass_payload: payload,
        })
    }
}
