//! Transaction Repository
//!
//! Inserts happen inside the checkout transaction; a transaction row and its
//! items are created together and the audit/exit-pass fields are set exactly
//! once within the same unit. Everything else is read-only.

use super::{RepoError, RepoResult};
use shared::models::{Product, Transaction, TransactionDetail, TransactionItem, TransactionItemDetail};
use sqlx::{SqliteConnection, SqlitePool};

/// Insert the transaction row
pub async fn insert(conn: &mut SqliteConnection, t: &Transaction) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO transactions \
         (id, user_id, total_amount, created_at, payment_ref, requires_audit, audit_reason, exit_pass) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(t.id)
    .bind(t.user_id)
    .bind(t.total_amount)
    .bind(t.created_at)
    .bind(&t.payment_ref)
    .bind(t.requires_audit)
    .bind(&t.audit_reason)
    .bind(&t.exit_pass)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Insert one frozen item snapshot
pub async fn insert_item(conn: &mut SqliteConnection, item: &TransactionItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO transaction_item \
         (id, transaction_id, product_id, quantity, price_at_purchase) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.transaction_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price_at_purchase)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Set the audit verdict, once, during the checkout unit
pub async fn set_audit(
    conn: &mut SqliteConnection,
    id: i64,
    requires_audit: bool,
    audit_reason: Option<&str>,
) -> RepoResult<()> {
    sqlx::query("UPDATE transactions SET requires_audit = ?, audit_reason = ? WHERE id = ?")
        .bind(requires_audit)
        .bind(audit_reason)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Attach the rendered exit-pass artifact, once, during the checkout unit
pub async fn set_exit_pass(conn: &mut SqliteConnection, id: i64, exit_pass: &str) -> RepoResult<()> {
    sqlx::query("UPDATE transactions SET exit_pass = ? WHERE id = ?")
        .bind(exit_pass)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Look up a transaction by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Transaction>> {
    let t = sqlx::query_as::<_, Transaction>(
        "SELECT id, user_id, total_amount, created_at, payment_ref, \
                requires_audit, audit_reason, exit_pass \
         FROM transactions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(t)
}

/// A user's transactions, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Transaction>> {
    let list = sqlx::query_as::<_, Transaction>(
        "SELECT id, user_id, total_amount, created_at, payment_ref, \
                requires_audit, audit_reason, exit_pass \
         FROM transactions WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(list)
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    product_id: i64,
    quantity: i64,
    price_at_purchase: f64,
    barcode: String,
    name: String,
    price: f64,
}

/// Item snapshots for a transaction, with product identity attached
pub async fn item_details(
    pool: &SqlitePool,
    transaction_id: i64,
) -> RepoResult<Vec<TransactionItemDetail>> {
    let rows = sqlx::query_as::<_, ItemRow>(
        "SELECT ti.id, ti.product_id, ti.quantity, ti.price_at_purchase, \
                p.barcode, p.name, p.price \
         FROM transaction_item ti JOIN product p ON p.id = ti.product_id \
         WHERE ti.transaction_id = ? ORDER BY ti.id",
    )
    .bind(transaction_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| TransactionItemDetail {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            price_at_purchase: row.price_at_purchase,
            product: Product {
                id: row.product_id,
                barcode: row.barcode,
                name: row.name,
                price: row.price,
            },
        })
        .collect())
}

/// Full detail: transaction row plus item snapshots
pub async fn detail(pool: &SqlitePool, id: i64) -> RepoResult<TransactionDetail> {
    let t = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Transaction {id} not found")))?;
    let items = item_details(pool, id).await?;
    Ok(TransactionDetail {
        id: t.id,
        user_id: t.user_id,
        total_amount: t.total_amount,
        created_at: t.created_at,
        requires_audit: t.requires_audit,
        audit_reason: t.audit_reason,
        exit_pass: t.exit_pass,
        items,
    })
}
