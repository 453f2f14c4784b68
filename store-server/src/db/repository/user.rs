//! User Repository
//!
//! Identity lives in the auth collaborator; this surface only resolves the
//! customer identity attached to verified transactions (and seeds fixtures).

use super::RepoResult;
use shared::models::User;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, first_name, last_name, password_hash, is_admin \
         FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn insert(pool: &SqlitePool, user: &User) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO user (id, email, first_name, last_name, password_hash, is_admin) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password_hash)
    .bind(user.is_admin)
    .execute(pool)
    .await?;
    Ok(())
}
