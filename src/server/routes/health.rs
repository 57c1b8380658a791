//! Liveness endpoint.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// `GET /health`. Always answers, even when the gateway is misconfigured.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
