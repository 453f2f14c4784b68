//! Verification Service
//!
//! Authenticates a scanned exit pass against stored transaction state.
//! Single pass over three decode paths, strongest first:
//!
//! 1. **Signed**: full payload with a valid MAC — resolved by embedded
//!    transaction id, then cross-checked against the stored row.
//! 2. **Legacy unsigned JSON**: structured data with a bare transaction
//!    identifier and an absent/invalid MAC. Accepted for backward
//!    compatibility with pre-signature passes. This is a known, documented
//!    security gap; do not silently harden it away.
//! 3. **Legacy text**: a transaction-id marker embedded in free text. The
//!    pattern is kept exactly as the legacy format shipped it, escaping
//!    quirks included.
//!
//! Verification is read-only and never blocks checkouts of other users.

use std::sync::LazyLock;

use regex::Regex;
use sqlx::SqlitePool;
use std::sync::Arc;

use shared::exit_pass::ExitPassPayload;
use shared::models::VerifiedTransaction;

use crate::auth::CurrentUser;
use crate::db::repository::{transaction, user};
use crate::services::exit_pass::ExitPassSigner;
use crate::utils::money::money_matches;
use crate::utils::{AppError, AppResult};

/// Legacy free-text marker, preserved byte-for-byte from the legacy format
static LEGACY_TEXT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Transaction\\s*ID[:\\s]+(\\d+)")
        // SAFETY: fixed pattern, valid by inspection
        .expect("legacy pattern is a valid regex")
});

/// How the scanned text was resolved to a transaction
enum DecodePath {
    /// Valid MAC; cross-checks apply
    Signed(ExitPassPayload),
    /// Structured or free-text id without a valid MAC
    Legacy,
}

pub struct VerifyService {
    db: SqlitePool,
    signer: Arc<ExitPassSigner>,
}

impl VerifyService {
    pub fn new(db: SqlitePool, signer: Arc<ExitPassSigner>) -> Self {
        Self { db, signer }
    }

    /// Verify a scanned exit pass and return the transaction's full detail.
    ///
    /// Requires elevated privilege; the check runs before any parsing.
    pub async fn verify_exit_pass(
        &self,
        caller: &CurrentUser,
        scanned: &str,
    ) -> AppResult<VerifiedTransaction> {
        if !caller.is_admin {
            return Err(AppError::forbidden(
                "Admin privileges required for verification",
            ));
        }

        // Input checks run strictly after the privilege gate
        if scanned.trim().is_empty() {
            return Err(AppError::validation("QR data is required"));
        }

        let (transaction_id, path) = self
            .decode(scanned)
            .ok_or(AppError::InvalidExitPass)?;

        let stored = transaction::find_by_id(&self.db, transaction_id)
            .await?
            .ok_or(AppError::InvalidExitPass)?;

        // Signed path: the payload must agree with stored state. The error
        // stays generic so a scanner cannot probe which field mismatched.
        if let DecodePath::Signed(payload) = &path {
            if !money_matches(payload.amt, stored.total_amount) {
                return Err(AppError::ExitPassMismatch);
            }
            if payload.uid != stored.user_id {
                return Err(AppError::ExitPassMismatch);
            }
        }

        let detail = transaction::detail(&self.db, stored.id).await?;
        let owner = user::find_by_id(&self.db, stored.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", stored.user_id)))?;

        tracing::info!(
            transaction_id = stored.id,
            verifier = caller.id,
            signed = matches!(path, DecodePath::Signed(_)),
            "Exit pass verified"
        );

        Ok(VerifiedTransaction {
            transaction: detail,
            customer: (&owner).into(),
            verified: true,
        })
    }

    /// Resolve the scanned text to a transaction id via the three decode
    /// paths. Returns `None` when no path yields an id.
    fn decode(&self, scanned: &str) -> Option<(i64, DecodePath)> {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(scanned) else {
            // Not structured data at all: legacy free-text extraction
            return extract_legacy_text_id(scanned).map(|id| (id, DecodePath::Legacy));
        };

        // Preferred: complete payload with a valid MAC
        if let Ok(payload) = serde_json::from_value::<ExitPassPayload>(value.clone())
            && self.signer.verify(&payload)
        {
            let tx = payload.tx;
            return Some((tx, DecodePath::Signed(payload)));
        }

        // Legacy unsigned structured payloads that still carry an id
        ["transaction_id", "id", "tx"]
            .iter()
            .find_map(|key| value.get(key).and_then(as_transaction_id))
            .map(|id| (id, DecodePath::Legacy))
    }
}

/// Accept both numeric and stringified transaction identifiers
fn as_transaction_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Legacy text path. Whether the shipped pattern can match real legacy text
/// is an open question (its character classes are double-escaped); a capture
/// that does not parse as digits fails closed.
fn extract_legacy_text_id(scanned: &str) -> Option<i64> {
    LEGACY_TEXT_PATTERN
        .captures(scanned)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_text_extraction_fails_closed_on_plain_marker_text() {
        // The shipped pattern does not match the plain marker form
        assert_eq!(extract_legacy_text_id("Transaction ID: 123"), None);
        assert_eq!(extract_legacy_text_id("receipt 9981"), None);
        assert_eq!(extract_legacy_text_id(""), None);
    }

    #[test]
    fn transaction_id_accepts_number_and_string_forms() {
        assert_eq!(as_transaction_id(&serde_json::json!(123)), Some(123));
        assert_eq!(as_transaction_id(&serde_json::json!("123")), Some(123));
        assert_eq!(as_transaction_id(&serde_json::json!("abc")), None);
        assert_eq!(as_transaction_id(&serde_json::json!(null)), None);
        assert_eq!(as_transaction_id(&serde_json::json!(12.5)), None);
    }
}
