pub mod order;
pub mod product;
pub mod reference;
pub mod stock_movement;

use axum::Json;
use serde_json::{json, Value};

// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Warehouse API" }))
}

// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
