//! PostgreSQL ledger store.
//!
//! Each unit of work wraps one `sqlx` transaction. `lock_product` issues
//! `SELECT ... FOR UPDATE`, so two units of work moving stock for the same
//! product queue up on the row lock instead of both acting on a stale count.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction as PgTransaction};
use tracing::instrument;

use super::{DeliveryWindow, LedgerStore, StoreError, UnitOfWork};
use crate::models::ledger::{
    Delivery, NewDelivery, NewTransaction, NewWarehouseEntry, NewWarehouseExit, Transaction,
    WarehouseEntry, WarehouseExit,
};
use crate::models::order::{NewOrder, NewOrderDetail, Order, OrderDetail};
use crate::models::product::{NewProduct, Product, ProductDelivery};
use crate::models::reference::{
    Category, NewCategory, NewSupplier, NewWarehouse, Supplier, Warehouse,
};

const PRODUCT_COLUMNS: &str = "product_id, product_name, description, category_id, supplier_id,
    quantity_in_stock, date_added, warehouse_id, unit_price";

#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: PgTransaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (product_name, description, category_id, supplier_id,
                 quantity_in_stock, date_added, warehouse_id, unit_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.supplier_id)
        .bind(product.quantity_in_stock)
        .bind(product.date_added)
        .bind(product.warehouse_id)
        .bind(product.unit_price)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn find_product(&mut self, product_id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn lock_product(&mut self, product_id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 FOR UPDATE"
        ))
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn set_product_stock(
        &mut self,
        product_id: i64,
        quantity_in_stock: i32,
    ) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET quantity_in_stock = $1 WHERE product_id = $2
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(quantity_in_stock)
        .bind(product_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn products_with_deliveries(
        &mut self,
        window: DeliveryWindow,
    ) -> Result<Vec<ProductDelivery>, StoreError> {
        let rows = sqlx::query_as::<_, ProductDelivery>(
            r#"SELECT p.product_id, p.product_name, p.description, p.category_id, p.supplier_id,
                      p.quantity_in_stock, p.date_added, p.warehouse_id, p.unit_price,
                      d.delivery_date_time, d.delivered_by, d.recipient_name, d.recipient_contact
               FROM products p
               JOIN deliveries d ON d.product_id = p.product_id
               WHERE ($1::TIMESTAMP IS NULL OR d.delivery_date_time >= $1)
                 AND ($2::TIMESTAMP IS NULL OR d.delivery_date_time <= $2)
               ORDER BY d.delivery_date_time ASC, d.delivery_id ASC"#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_delivery(&mut self, delivery: &NewDelivery) -> Result<Delivery, StoreError> {
        let row = sqlx::query_as::<_, Delivery>(
            r#"INSERT INTO deliveries (product_id, order_id, delivery_date_time, delivered_by,
                   recipient_name, recipient_contact)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING delivery_id, product_id, order_id, delivery_date_time, delivered_by,
                   recipient_name, recipient_contact"#,
        )
        .bind(delivery.product_id)
        .bind(delivery.order_id)
        .bind(delivery.delivery_date_time)
        .bind(&delivery.delivered_by)
        .bind(&delivery.recipient_name)
        .bind(&delivery.recipient_contact)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn insert_warehouse_entry(
        &mut self,
        entry: &NewWarehouseEntry,
    ) -> Result<WarehouseEntry, StoreError> {
        let row = sqlx::query_as::<_, WarehouseEntry>(
            r#"INSERT INTO warehouse_entries (product_id, entry_date_time, quantity_entered,
                   entered_by, historical, warehouse_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING entry_id, product_id, entry_date_time, quantity_entered, entered_by,
                   historical, warehouse_id"#,
        )
        .bind(entry.product_id)
        .bind(entry.entry_date_time)
        .bind(entry.quantity_entered)
        .bind(&entry.entered_by)
        .bind(entry.historical)
        .bind(entry.warehouse_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn insert_warehouse_exit(
        &mut self,
        exit: &NewWarehouseExit,
    ) -> Result<WarehouseExit, StoreError> {
        let row = sqlx::query_as::<_, WarehouseExit>(
            r#"INSERT INTO warehouse_exits (product_id, exit_date_time, quantity_exited, exited_by,
                   recipient_name, recipient_contact, historical, warehouse_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING exit_id, product_id, exit_date_time, quantity_exited, exited_by,
                   recipient_name, recipient_contact, historical, warehouse_id"#,
        )
        .bind(exit.product_id)
        .bind(exit.exit_date_time)
        .bind(exit.quantity_exited)
        .bind(&exit.exited_by)
        .bind(&exit.recipient_name)
        .bind(&exit.recipient_contact)
        .bind(exit.historical)
        .bind(exit.warehouse_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn warehouse_entries_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<WarehouseEntry>, StoreError> {
        let rows = sqlx::query_as::<_, WarehouseEntry>(
            r#"SELECT entry_id, product_id, entry_date_time, quantity_entered, entered_by,
                      historical, warehouse_id
               FROM warehouse_entries WHERE product_id = $1 ORDER BY entry_id"#,
        )
        .bind(product_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn warehouse_exits_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<WarehouseExit>, StoreError> {
        let rows = sqlx::query_as::<_, WarehouseExit>(
            r#"SELECT exit_id, product_id, exit_date_time, quantity_exited, exited_by,
                      recipient_name, recipient_contact, historical, warehouse_id
               FROM warehouse_exits WHERE product_id = $1 ORDER BY exit_id"#,
        )
        .bind(product_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"INSERT INTO transactions (transaction_date_time, product_id, transaction_type,
                   quantity, related_id, transaction_description)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING transaction_id, transaction_date_time, product_id, transaction_type,
                   quantity, related_id, transaction_description"#,
        )
        .bind(transaction.transaction_date_time)
        .bind(transaction.product_id)
        .bind(transaction.transaction_type)
        .bind(transaction.quantity)
        .bind(transaction.related_id)
        .bind(&transaction.transaction_description)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn transactions_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"SELECT transaction_id, transaction_date_time, product_id, transaction_type,
                      quantity, related_id, transaction_description
               FROM transactions WHERE product_id = $1 ORDER BY transaction_id"#,
        )
        .bind(product_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_category(&mut self, category: &NewCategory) -> Result<Category, StoreError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (category_name) VALUES ($1)
             RETURNING category_id, category_name",
        )
        .bind(&category.category_name)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT category_id, category_name FROM categories ORDER BY category_id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_supplier(&mut self, supplier: &NewSupplier) -> Result<Supplier, StoreError> {
        let row = sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (supplier_name, contact_information, address) VALUES ($1, $2, $3)
             RETURNING supplier_id, supplier_name, contact_information, address",
        )
        .bind(&supplier.supplier_name)
        .bind(&supplier.contact_information)
        .bind(&supplier.address)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, StoreError> {
        let rows = sqlx::query_as::<_, Supplier>(
            "SELECT supplier_id, supplier_name, contact_information, address
             FROM suppliers ORDER BY supplier_id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_warehouse(
        &mut self,
        warehouse: &NewWarehouse,
    ) -> Result<Warehouse, StoreError> {
        let row = sqlx::query_as::<_, Warehouse>(
            "INSERT INTO warehouses (location_name, address, contact_information) VALUES ($1, $2, $3)
             RETURNING warehouse_id, location_name, address, contact_information",
        )
        .bind(&warehouse.location_name)
        .bind(&warehouse.address)
        .bind(&warehouse.contact_information)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_warehouses(&mut self) -> Result<Vec<Warehouse>, StoreError> {
        let rows = sqlx::query_as::<_, Warehouse>(
            "SELECT warehouse_id, location_name, address, contact_information
             FROM warehouses ORDER BY warehouse_id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, Order>(
            r#"INSERT INTO orders (order_date, customer_name, customer_contact, total_amount)
               VALUES ($1, $2, $3, $4)
               RETURNING order_id, order_date, customer_name, customer_contact, total_amount"#,
        )
        .bind(order.order_date)
        .bind(&order.customer_name)
        .bind(&order.customer_contact)
        .bind(order.total_amount)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn insert_order_detail(
        &mut self,
        detail: &NewOrderDetail,
    ) -> Result<OrderDetail, StoreError> {
        let row = sqlx::query_as::<_, OrderDetail>(
            r#"INSERT INTO order_details (order_id, product_id, quantity, subtotal)
               VALUES ($1, $2, $3, $4)
               RETURNING order_detail_id, order_id, product_id, quantity, subtotal"#,
        )
        .bind(detail.order_id)
        .bind(detail.product_id)
        .bind(detail.quantity)
        .bind(detail.subtotal)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn find_order(&mut self, order_id: i64) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, Order>(
            "SELECT order_id, order_date, customer_name, customer_contact, total_amount
             FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn order_details(&mut self, order_id: i64) -> Result<Vec<OrderDetail>, StoreError> {
        let rows = sqlx::query_as::<_, OrderDetail>(
            "SELECT order_detail_id, order_id, product_id, quantity, subtotal
             FROM order_details WHERE order_id = $1 ORDER BY order_detail_id",
        )
        .bind(order_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn list_orders(&mut self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, Order>(
            "SELECT order_id, order_date, customer_name, customer_contact, total_amount
             FROM orders ORDER BY order_id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
