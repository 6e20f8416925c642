//! Ledger store: the transactional data-access seam the services run against.
//!
//! A [`LedgerStore`] hands out [`UnitOfWork`] values. Everything a service
//! reads or writes for one request goes through a single unit of work, which
//! the caller commits once the service returns successfully. Dropping a unit
//! of work without calling [`UnitOfWork::commit`] discards every write made
//! through it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::ledger::{
    Delivery, NewDelivery, NewTransaction, NewWarehouseEntry, NewWarehouseExit, Transaction,
    WarehouseEntry, WarehouseExit,
};
use crate::models::order::{NewOrder, NewOrderDetail, Order, OrderDetail};
use crate::models::product::{NewProduct, Product, ProductDelivery};
use crate::models::reference::{
    Category, NewCategory, NewSupplier, NewWarehouse, Supplier, Warehouse,
};

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A foreign-key, check or uniqueness rule rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

// SQLSTATE classes for integrity violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if let Some(code) = db_err.code() {
                if matches!(
                    code.as_ref(),
                    FOREIGN_KEY_VIOLATION | UNIQUE_VIOLATION | CHECK_VIOLATION
                ) {
                    return StoreError::Constraint(db_err.message().to_string());
                }
            }
        }
        StoreError::Database(err)
    }
}

/// Inclusive time window over `delivery_date_time`. A missing bound leaves
/// that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DeliveryWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;
}

#[async_trait]
pub trait UnitOfWork: Send {
    // Products
    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product, StoreError>;
    async fn find_product(&mut self, product_id: i64) -> Result<Option<Product>, StoreError>;
    /// Reads a product and holds it against concurrent writers until this
    /// unit of work ends.
    async fn lock_product(&mut self, product_id: i64) -> Result<Option<Product>, StoreError>;
    async fn set_product_stock(
        &mut self,
        product_id: i64,
        quantity_in_stock: i32,
    ) -> Result<Product, StoreError>;
    async fn products_with_deliveries(
        &mut self,
        window: DeliveryWindow,
    ) -> Result<Vec<ProductDelivery>, StoreError>;

    // Movements
    async fn insert_delivery(&mut self, delivery: &NewDelivery) -> Result<Delivery, StoreError>;
    async fn insert_warehouse_entry(
        &mut self,
        entry: &NewWarehouseEntry,
    ) -> Result<WarehouseEntry, StoreError>;
    async fn insert_warehouse_exit(
        &mut self,
        exit: &NewWarehouseExit,
    ) -> Result<WarehouseExit, StoreError>;
    async fn warehouse_entries_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<WarehouseEntry>, StoreError>;
    async fn warehouse_exits_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<WarehouseExit>, StoreError>;

    // Transactions
    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, StoreError>;
    async fn transactions_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<Transaction>, StoreError>;

    // Reference data
    async fn insert_category(&mut self, category: &NewCategory) -> Result<Category, StoreError>;
    async fn list_categories(&mut self) -> Result<Vec<Category>, StoreError>;
    async fn insert_supplier(&mut self, supplier: &NewSupplier) -> Result<Supplier, StoreError>;
    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, StoreError>;
    async fn insert_warehouse(&mut self, warehouse: &NewWarehouse)
        -> Result<Warehouse, StoreError>;
    async fn list_warehouses(&mut self) -> Result<Vec<Warehouse>, StoreError>;

    // Orders
    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order, StoreError>;
    async fn insert_order_detail(
        &mut self,
        detail: &NewOrderDetail,
    ) -> Result<OrderDetail, StoreError>;
    async fn find_order(&mut self, order_id: i64) -> Result<Option<Order>, StoreError>;
    async fn order_details(&mut self, order_id: i64) -> Result<Vec<OrderDetail>, StoreError>;
    async fn list_orders(&mut self) -> Result<Vec<Order>, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn open_window_contains_everything() {
        let window = DeliveryWindow::default();
        assert!(window.contains(at(1, 0)));
        assert!(window.contains(at(31, 23)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DeliveryWindow { start: Some(at(5, 8)), end: Some(at(6, 8)) };
        assert!(window.contains(at(5, 8)));
        assert!(window.contains(at(6, 8)));
        assert!(!window.contains(at(5, 7)));
        assert!(!window.contains(at(6, 9)));
    }

    #[test]
    fn half_open_window() {
        let window = DeliveryWindow { start: None, end: Some(at(10, 0)) };
        assert!(window.contains(at(1, 0)));
        assert!(!window.contains(at(11, 0)));
    }
}
