//! Cart Model

use serde::{Deserialize, Serialize};

/// One cart line joined with the live catalog price.
///
/// Mutable until checkout; the whole set is deleted atomically when the
/// cart is frozen into a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Live catalog price at read time
    pub price: f64,
}
