//! Transaction API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use shared::models::{CheckoutResponse, TransactionDetail, VerifiedTransaction};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::transaction;
use crate::utils::AppResult;

/// POST /api/transactions/checkout — freeze the caller's cart
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let response = state.checkout.finalize_checkout(user.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/transactions — the caller's history, newest first
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<TransactionDetail>>> {
    let transactions = transaction::find_by_user(&state.db, user.id).await?;

    let mut history = Vec::with_capacity(transactions.len());
    for t in transactions {
        let items = transaction::item_details(&state.db, t.id).await?;
        history.push(TransactionDetail {
            id: t.id,
            user_id: t.user_id,
            total_amount: t.total_amount,
            created_at: t.created_at,
            requires_audit: t.requires_audit,
            audit_reason: t.audit_reason,
            exit_pass: t.exit_pass,
            items,
        });
    }

    Ok(Json(history))
}

#[derive(Debug, Deserialize)]
pub struct VerifyExitPassRequest {
    /// Raw scanned QR text
    pub qr_data: String,
}

/// POST /api/transactions/verify-exit-pass — authenticate a scanned pass
pub async fn verify_exit_pass(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(request): Json<VerifyExitPassRequest>,
) -> AppResult<Json<VerifiedTransaction>> {
    let verdict = state
        .verify
        .verify_exit_pass(&user, &request.qr_data)
        .await?;
    Ok(Json(verdict))
}
