//! Transaction Models
//!
//! A transaction is created once per successful checkout and is immutable
//! afterwards, except for the audit fields and the exit-pass artifact which
//! are set exactly once during the same checkout unit.

use serde::{Deserialize, Serialize};

use crate::exit_pass::ExitPassPayload;
use crate::models::{CustomerSummary, Product};

/// Transaction entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Total amount, rounded to 2 decimals
    pub total_amount: f64,
    /// Creation timestamp (UTC milliseconds)
    pub created_at: i64,
    /// External payment collaborator reference, when known
    pub payment_ref: Option<String>,
    /// Selected for manual review
    pub requires_audit: bool,
    /// Why the audit flag was set (last matching policy rule)
    pub audit_reason: Option<String>,
    /// Rendered exit-pass image as a PNG data URL
    pub exit_pass: Option<String>,
}

/// Frozen snapshot of a cart line at checkout time.
///
/// `price_at_purchase` is decoupled from any later catalog price change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price_at_purchase: f64,
}

/// Transaction item with its product snapshot attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItemDetail {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price_at_purchase: f64,
    pub product: Product,
}

/// Full transaction detail as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub id: i64,
    pub user_id: i64,
    pub total_amount: f64,
    pub created_at: i64,
    pub requires_audit: bool,
    pub audit_reason: Option<String>,
    pub exit_pass: Option<String>,
    pub items: Vec<TransactionItemDetail>,
}

/// Checkout result: the persisted transaction plus the raw signed payload
/// (the QR image encodes the same text; the raw form is for diagnostics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub transaction: TransactionDetail,
    pub exit_pass_payload: ExitPassPayload,
}

/// Verification verdict for a successfully authenticated scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedTransaction {
    #[serde(flatten)]
    pub transaction: TransactionDetail,
    pub customer: CustomerSummary,
    pub verified: bool,
}
