//! Repository Module
//!
//! Free-function data access over the SQLite pool. Functions that must take
//! part in the atomic checkout unit accept `&mut SqliteConnection` so they
//! run inside the caller's transaction; read paths take the pool directly.

pub mod cart;
pub mod product;
pub mod transaction;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
