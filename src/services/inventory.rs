//! Stock movements.
//!
//! `quantity_in_stock` only changes here, and every change is written in the
//! same unit of work as the row that justifies it plus one `transactions`
//! row pointing back at that row.

use chrono::{NaiveDateTime, Utc};
use tracing::{info, instrument};

use super::InventoryError;
use crate::models::ledger::{
    NewDelivery, NewTransaction, NewWarehouseEntry, NewWarehouseExit, TransactionType,
};
use crate::models::product::{NewProduct, Product};
use crate::store::UnitOfWork;

/// Hand-off recorded alongside a newly created product.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryDetails {
    pub delivery_date_time: NaiveDateTime,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockExit {
    pub quantity_exited: i32,
    pub exited_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockDelivery {
    pub quantity_delivered: i32,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

/// Creates a product together with its intake delivery and the `addition`
/// transaction for its opening stock.
///
/// Category, supplier and warehouse ids are not checked here; the store's
/// referential constraints reject unknown ones.
#[instrument(skip(uow, product, intake), fields(product_name = %product.product_name))]
pub async fn create_product(
    uow: &mut dyn UnitOfWork,
    product: NewProduct,
    intake: DeliveryDetails,
) -> Result<Product, InventoryError> {
    if product.quantity_in_stock < 0 {
        return Err(InventoryError::validation("quantity_in_stock must be >= 0"));
    }

    let created = uow.insert_product(&product).await?;

    uow.insert_delivery(&NewDelivery {
        product_id: created.product_id,
        order_id: None,
        delivery_date_time: intake.delivery_date_time,
        delivered_by: intake.delivered_by,
        recipient_name: intake.recipient_name,
        recipient_contact: intake.recipient_contact,
    })
    .await?;

    uow.insert_transaction(&NewTransaction {
        transaction_date_time: Utc::now().naive_utc(),
        product_id: created.product_id,
        transaction_type: TransactionType::Addition,
        quantity: created.quantity_in_stock,
        related_id: created.product_id,
        transaction_description: Some("opening stock".to_string()),
    })
    .await?;

    info!(
        product_id = created.product_id,
        quantity_in_stock = created.quantity_in_stock,
        "product created"
    );
    Ok(created)
}

/// Takes stock out of the product's warehouse.
#[instrument(skip(uow, exit), fields(quantity = exit.quantity_exited))]
pub async fn exit_product(
    uow: &mut dyn UnitOfWork,
    product_id: i64,
    exit: StockExit,
) -> Result<Product, InventoryError> {
    if exit.quantity_exited <= 0 {
        return Err(InventoryError::validation("quantity_exited must be greater than 0"));
    }

    let product = uow
        .lock_product(product_id)
        .await?
        .ok_or(InventoryError::NotFound("Product"))?;

    if product.quantity_in_stock < exit.quantity_exited {
        return Err(InventoryError::InsufficientStock {
            available: product.quantity_in_stock,
            requested: exit.quantity_exited,
        });
    }

    let updated = uow
        .set_product_stock(product_id, product.quantity_in_stock - exit.quantity_exited)
        .await?;

    let now = Utc::now().naive_utc();
    let exit_row = uow
        .insert_warehouse_exit(&NewWarehouseExit {
            product_id,
            exit_date_time: now,
            quantity_exited: exit.quantity_exited,
            exited_by: exit.exited_by,
            recipient_name: exit.recipient_name.clone(),
            recipient_contact: exit.recipient_contact,
            historical: false,
            warehouse_id: product.warehouse_id,
        })
        .await?;

    uow.insert_transaction(&NewTransaction {
        transaction_date_time: now,
        product_id,
        transaction_type: TransactionType::Exit,
        quantity: exit.quantity_exited,
        related_id: exit_row.exit_id,
        transaction_description: Some(format!("exit to {}", exit.recipient_name)),
    })
    .await?;

    info!(
        product_id,
        exit_id = exit_row.exit_id,
        quantity_in_stock = updated.quantity_in_stock,
        "stock exited"
    );
    Ok(updated)
}

/// Receives stock into the product's warehouse. There is no upper bound
/// besides the range of the stock counter.
#[instrument(skip(uow, delivery), fields(quantity = delivery.quantity_delivered))]
pub async fn deliver_product(
    uow: &mut dyn UnitOfWork,
    product_id: i64,
    delivery: StockDelivery,
) -> Result<Product, InventoryError> {
    if delivery.quantity_delivered <= 0 {
        return Err(InventoryError::validation("quantity_delivered must be greater than 0"));
    }

    let product = uow
        .lock_product(product_id)
        .await?
        .ok_or(InventoryError::NotFound("Product"))?;

    let new_quantity = product
        .quantity_in_stock
        .checked_add(delivery.quantity_delivered)
        .ok_or_else(|| InventoryError::validation("quantity_in_stock would overflow"))?;

    let updated = uow.set_product_stock(product_id, new_quantity).await?;

    let now = Utc::now().naive_utc();
    let entry = uow
        .insert_warehouse_entry(&NewWarehouseEntry {
            product_id,
            entry_date_time: now,
            quantity_entered: delivery.quantity_delivered,
            entered_by: delivery.delivered_by.clone(),
            historical: false,
            warehouse_id: product.warehouse_id,
        })
        .await?;

    uow.insert_transaction(&NewTransaction {
        transaction_date_time: now,
        product_id,
        transaction_type: TransactionType::Delivery,
        quantity: delivery.quantity_delivered,
        related_id: entry.entry_id,
        transaction_description: Some(format!(
            "delivered by {} to {} ({})",
            delivery.delivered_by, delivery.recipient_name, delivery.recipient_contact
        )),
    })
    .await?;

    info!(
        product_id,
        entry_id = entry.entry_id,
        quantity_in_stock = updated.quantity_in_stock,
        "stock delivered"
    );
    Ok(updated)
}
