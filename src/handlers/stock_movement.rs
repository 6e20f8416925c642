use axum::{
    extract::State,
    Json,
};
use tracing::instrument;

use crate::dtos::stock_movement::{DeliverProductParams, ExitProductParams};
use crate::error::AppError;
use crate::extract::{ApiPath, ApiQuery};
use crate::models::ledger::Transaction;
use crate::models::product::Product;
use crate::services::inventory::{self, StockDelivery, StockExit};
use crate::services::query::{self, ProductMovements, StockAudit};
use crate::state::AppState;

// ==================== Exit Product ====================

#[instrument(skip(store, params))]
pub async fn exit_product(
    State(AppState { store }): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<ExitProductParams>,
) -> Result<Json<Product>, AppError> {
    let exit = StockExit::try_from(params)?;

    let mut uow = store.begin().await?;
    let product = inventory::exit_product(uow.as_mut(), product_id, exit).await?;
    uow.commit().await?;

    Ok(Json(product))
}

// ==================== Deliver Product ====================

#[instrument(skip(store, params))]
pub async fn deliver_product(
    State(AppState { store }): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<DeliverProductParams>,
) -> Result<Json<Product>, AppError> {
    let delivery = StockDelivery::try_from(params)?;

    let mut uow = store.begin().await?;
    let product = inventory::deliver_product(uow.as_mut(), product_id, delivery).await?;
    uow.commit().await?;

    Ok(Json(product))
}

// ==================== Product History ====================

#[instrument(skip(store))]
pub async fn get_product_transactions(
    State(AppState { store }): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let mut uow = store.begin().await?;
    let transactions = query::list_transactions_for_product(uow.as_mut(), product_id).await?;
    Ok(Json(transactions))
}

#[instrument(skip(store))]
pub async fn get_product_movements(
    State(AppState { store }): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<ProductMovements>, AppError> {
    let mut uow = store.begin().await?;
    let movements = query::list_movements_for_product(uow.as_mut(), product_id).await?;
    Ok(Json(movements))
}

#[instrument(skip(store))]
pub async fn get_stock_audit(
    State(AppState { store }): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<StockAudit>, AppError> {
    let mut uow = store.begin().await?;
    let audit = query::audit_product_stock(uow.as_mut(), product_id).await?;
    if !audit.consistent {
        tracing::warn!(
            product_id,
            quantity_in_stock = audit.quantity_in_stock,
            ledger_balance = audit.ledger_balance,
            "stock level disagrees with transaction log"
        );
    }
    Ok(Json(audit))
}
