//! Read-side lookups.

use serde::Serialize;
use tracing::instrument;

use super::InventoryError;
use crate::models::ledger::{Transaction, WarehouseEntry, WarehouseExit};
use crate::models::product::{Product, ProductDelivery};
use crate::store::{DeliveryWindow, UnitOfWork};

/// Stock level compared with the balance rebuilt from the transaction log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAudit {
    pub product_id: i64,
    pub quantity_in_stock: i32,
    pub ledger_balance: i64,
    pub transaction_count: usize,
    pub consistent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMovements {
    pub product_id: i64,
    pub entries: Vec<WarehouseEntry>,
    pub exits: Vec<WarehouseExit>,
}

/// One row per (product, delivery) pair with the delivery inside `window`.
#[instrument(skip(uow))]
pub async fn list_products_by_delivery_date(
    uow: &mut dyn UnitOfWork,
    window: DeliveryWindow,
) -> Result<Vec<ProductDelivery>, InventoryError> {
    Ok(uow.products_with_deliveries(window).await?)
}

/// Transaction history of a product. Unknown ids give an empty list.
#[instrument(skip(uow))]
pub async fn list_transactions_for_product(
    uow: &mut dyn UnitOfWork,
    product_id: i64,
) -> Result<Vec<Transaction>, InventoryError> {
    Ok(uow.transactions_for_product(product_id).await?)
}

#[instrument(skip(uow))]
pub async fn get_product(
    uow: &mut dyn UnitOfWork,
    product_id: i64,
) -> Result<Product, InventoryError> {
    uow.find_product(product_id).await?.ok_or(InventoryError::NotFound("Product"))
}

#[instrument(skip(uow))]
pub async fn list_movements_for_product(
    uow: &mut dyn UnitOfWork,
    product_id: i64,
) -> Result<ProductMovements, InventoryError> {
    let product = get_product(uow, product_id).await?;
    let entries = uow.warehouse_entries_for_product(product.product_id).await?;
    let exits = uow.warehouse_exits_for_product(product.product_id).await?;
    Ok(ProductMovements { product_id, entries, exits })
}

#[instrument(skip(uow))]
pub async fn audit_product_stock(
    uow: &mut dyn UnitOfWork,
    product_id: i64,
) -> Result<StockAudit, InventoryError> {
    let product = get_product(uow, product_id).await?;
    let transactions = uow.transactions_for_product(product_id).await?;

    let ledger_balance: i64 = transactions
        .iter()
        .map(|tx| tx.transaction_type.stock_sign() * i64::from(tx.quantity))
        .sum();

    Ok(StockAudit {
        product_id,
        quantity_in_stock: product.quantity_in_stock,
        ledger_balance,
        transaction_count: transactions.len(),
        consistent: ledger_balance == i64::from(product.quantity_in_stock),
    })
}
