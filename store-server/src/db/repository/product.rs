//! Product Repository
//!
//! Catalog management is out of core scope; carts and item snapshots only
//! need price/identity lookups.

use super::RepoResult;
use shared::models::Product;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>("SELECT id, barcode, name, price FROM product WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(product)
}

pub async fn insert(pool: &SqlitePool, product: &Product) -> RepoResult<()> {
    sqlx::query("INSERT INTO product (id, barcode, name, price) VALUES (?, ?, ?, ?)")
        .bind(product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price)
        .execute(pool)
        .await?;
    Ok(())
}

/// Update the live catalog price (used to show price-at-purchase freezing)
pub async fn set_price(pool: &SqlitePool, id: i64, price: f64) -> RepoResult<()> {
    sqlx::query("UPDATE product SET price = ? WHERE id = ?")
        .bind(price)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
