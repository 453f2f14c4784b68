//! Health check endpoint

use axum::Json;
use serde_json::{Value, json};

use crate::utils::error::{AppResponse, ok};

/// GET /api/health — liveness probe
pub async fn health() -> Json<AppResponse<Value>> {
    ok(json!({
        "status": "ok",
        "service": "store-server",
    }))
}
