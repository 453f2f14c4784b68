//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`transactions`] - checkout, history and exit-pass verification

pub mod health;
pub mod transactions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Assemble the API router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/transactions/checkout", post(transactions::checkout))
        .route("/api/transactions", get(transactions::history))
        .route(
            "/api/transactions/verify-exit-pass",
            post(transactions::verify_exit_pass),
        )
        .with_state(state)
}
