//! Cart Repository
//!
//! The cart-store collaborator surface: read the current lines with live
//! product prices, clear on successful checkout. Mutations participate in
//! the checkout transaction via `&mut SqliteConnection`.

use super::RepoResult;
use shared::models::CartLine;
use shared::util::snowflake_id;
use sqlx::{SqliteConnection, SqlitePool};

/// Read a user's cart lines joined with the live catalog price
pub async fn items_with_price(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> RepoResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT ci.product_id, ci.quantity, p.price \
         FROM cart_item ci JOIN product p ON p.id = ci.product_id \
         WHERE ci.user_id = ? ORDER BY ci.id",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(lines)
}

/// Delete all of a user's cart lines, returning how many were removed
pub async fn clear(conn: &mut SqliteConnection, user_id: i64) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Put a line into a user's cart (upsert on product)
pub async fn set_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO cart_item (id, user_id, product_id, quantity) VALUES (?, ?, ?, ?) \
         ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = excluded.quantity",
    )
    .bind(snowflake_id())
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}
