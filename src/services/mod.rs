//! Business logic. Every function takes the caller's unit of work and never
//! commits it; the handler decides when the unit ends.

pub mod inventory;
pub mod query;
pub mod reference;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Insufficient quantity in stock: available {available}, requested {requested}")]
    InsufficientStock { available: i32, requested: i32 },
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        InventoryError::Validation(msg.into())
    }
}
