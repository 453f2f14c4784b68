//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity — catalog CRUD is out of core scope; this exists so cart
/// lines can resolve a live price and item snapshots can carry identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub barcode: String,
    pub name: String,
    /// Current catalog price (2-decimal monetary value)
    pub price: f64,
}
