// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::services::InventoryError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    StoreError(StoreError),
    NotFound(String),
    ValidationError(String),
    InsufficientStock(String),
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::StoreError(e) => {
                tracing::error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            AppError::InsufficientStock(msg) => (StatusCode::BAD_REQUEST, "insufficient_stock", msg),
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreError(err)
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(what) => AppError::not_found(format!("{what} not found")),
            InventoryError::InsufficientStock { .. } => {
                AppError::InsufficientStock("Insufficient quantity in stock".to_string())
            }
            InventoryError::Validation(msg) => AppError::ValidationError(msg),
            InventoryError::Store(e) => AppError::StoreError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (InventoryError::NotFound("Product"), StatusCode::NOT_FOUND),
            (
                InventoryError::InsufficientStock { available: 1, requested: 2 },
                StatusCode::BAD_REQUEST,
            ),
            (InventoryError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                InventoryError::Store(StoreError::Constraint("fk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
