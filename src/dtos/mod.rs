pub mod order;
pub mod product;
pub mod reference;
pub mod stock_movement;

use crate::error::AppError;

/// Rejects blank text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!("{field} must be a number >= 0")));
    }
    Ok(())
}
