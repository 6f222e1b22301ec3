use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Always 200; checks no dependencies.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
