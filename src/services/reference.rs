//! Categories, suppliers, warehouses and customer orders.

use serde::Serialize;
use tracing::{info, instrument};

use super::InventoryError;
use crate::models::order::{NewOrder, NewOrderDetail, Order, OrderDetail, OrderLine};
use crate::models::reference::{
    Category, NewCategory, NewSupplier, NewWarehouse, Supplier, Warehouse,
};
use crate::store::UnitOfWork;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub details: Vec<OrderDetail>,
}

#[instrument(skip(uow))]
pub async fn create_category(
    uow: &mut dyn UnitOfWork,
    category: NewCategory,
) -> Result<Category, InventoryError> {
    Ok(uow.insert_category(&category).await?)
}

pub async fn list_categories(uow: &mut dyn UnitOfWork) -> Result<Vec<Category>, InventoryError> {
    Ok(uow.list_categories().await?)
}

#[instrument(skip(uow))]
pub async fn create_supplier(
    uow: &mut dyn UnitOfWork,
    supplier: NewSupplier,
) -> Result<Supplier, InventoryError> {
    Ok(uow.insert_supplier(&supplier).await?)
}

pub async fn list_suppliers(uow: &mut dyn UnitOfWork) -> Result<Vec<Supplier>, InventoryError> {
    Ok(uow.list_suppliers().await?)
}

#[instrument(skip(uow))]
pub async fn create_warehouse(
    uow: &mut dyn UnitOfWork,
    warehouse: NewWarehouse,
) -> Result<Warehouse, InventoryError> {
    Ok(uow.insert_warehouse(&warehouse).await?)
}

pub async fn list_warehouses(uow: &mut dyn UnitOfWork) -> Result<Vec<Warehouse>, InventoryError> {
    Ok(uow.list_warehouses().await?)
}

/// Stores an order header and its line items. `total_amount` is kept as
/// given; it is not reconciled against the line subtotals.
#[instrument(skip(uow, order, lines), fields(lines = lines.len()))]
pub async fn create_order(
    uow: &mut dyn UnitOfWork,
    order: NewOrder,
    lines: Vec<OrderLine>,
) -> Result<OrderWithDetails, InventoryError> {
    if let Some(line) = lines.iter().find(|l| l.quantity <= 0) {
        return Err(InventoryError::validation(format!(
            "Order line for product {} must have quantity > 0",
            line.product_id
        )));
    }

    let header = uow.insert_order(&order).await?;

    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        let detail = uow
            .insert_order_detail(&NewOrderDetail {
                order_id: header.order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                subtotal: line.subtotal,
            })
            .await?;
        details.push(detail);
    }

    info!(order_id = header.order_id, lines = details.len(), "order created");
    Ok(OrderWithDetails { order: header, details })
}

pub async fn get_order(
    uow: &mut dyn UnitOfWork,
    order_id: i64,
) -> Result<OrderWithDetails, InventoryError> {
    let order = uow.find_order(order_id).await?.ok_or(InventoryError::NotFound("Order"))?;
    let details = uow.order_details(order_id).await?;
    Ok(OrderWithDetails { order, details })
}

pub async fn list_orders(uow: &mut dyn UnitOfWork) -> Result<Vec<Order>, InventoryError> {
    Ok(uow.list_orders().await?)
}
