//! In-process ledger store.
//!
//! All tables live behind one async mutex. A unit of work holds the lock for
//! its whole lifetime and edits a private copy of the tables, which replaces
//! the shared copy only on commit. Units of work therefore run one at a time
//! and a dropped unit of work leaves no trace.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

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

#[derive(Debug, Default, Clone)]
struct Sequences {
    category: i64,
    supplier: i64,
    warehouse: i64,
    product: i64,
    order: i64,
    order_detail: i64,
    delivery: i64,
    entry: i64,
    exit: i64,
    transaction: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Debug, Default, Clone)]
struct Tables {
    seq: Sequences,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,
    warehouses: Vec<Warehouse>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_details: Vec<OrderDetail>,
    deliveries: Vec<Delivery>,
    entries: Vec<WarehouseEntry>,
    exits: Vec<WarehouseExit>,
    transactions: Vec<Transaction>,
}

impl Tables {
    fn product_mut(&mut self, product_id: i64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.product_id == product_id)
    }

    fn require_category(&self, category_id: i64) -> Result<(), StoreError> {
        if self.categories.iter().any(|c| c.category_id == category_id) {
            Ok(())
        } else {
            Err(missing_reference("category", category_id))
        }
    }

    fn require_supplier(&self, supplier_id: i64) -> Result<(), StoreError> {
        if self.suppliers.iter().any(|s| s.supplier_id == supplier_id) {
            Ok(())
        } else {
            Err(missing_reference("supplier", supplier_id))
        }
    }

    fn require_warehouse(&self, warehouse_id: i64) -> Result<(), StoreError> {
        if self.warehouses.iter().any(|w| w.warehouse_id == warehouse_id) {
            Ok(())
        } else {
            Err(missing_reference("warehouse", warehouse_id))
        }
    }

    fn require_product(&self, product_id: i64) -> Result<(), StoreError> {
        if self.products.iter().any(|p| p.product_id == product_id) {
            Ok(())
        } else {
            Err(missing_reference("product", product_id))
        }
    }

    fn require_order(&self, order_id: i64) -> Result<(), StoreError> {
        if self.orders.iter().any(|o| o.order_id == order_id) {
            Ok(())
        } else {
            Err(missing_reference("order", order_id))
        }
    }
}

fn missing_reference(table: &str, id: i64) -> StoreError {
    StoreError::Constraint(format!("{table} {id} does not exist"))
}

fn non_negative_stock(quantity: i32) -> Result<(), StoreError> {
    if quantity < 0 {
        return Err(StoreError::Constraint(format!(
            "quantity_in_stock must be >= 0, got {quantity}"
        )));
    }
    Ok(())
}

/// Ledger store kept entirely in memory. Cloning shares the same tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedgerStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product, StoreError> {
        let t = &mut self.working;
        t.require_category(product.category_id)?;
        t.require_supplier(product.supplier_id)?;
        t.require_warehouse(product.warehouse_id)?;
        non_negative_stock(product.quantity_in_stock)?;

        let row = Product {
            product_id: next_id(&mut t.seq.product),
            product_name: product.product_name.clone(),
            description: product.description.clone(),
            category_id: product.category_id,
            supplier_id: product.supplier_id,
            quantity_in_stock: product.quantity_in_stock,
            date_added: product.date_added,
            warehouse_id: product.warehouse_id,
            unit_price: product.unit_price,
        };
        t.products.push(row.clone());
        Ok(row)
    }

    async fn find_product(&mut self, product_id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.working.products.iter().find(|p| p.product_id == product_id).cloned())
    }

    async fn lock_product(&mut self, product_id: i64) -> Result<Option<Product>, StoreError> {
        // The whole store is already held by this unit of work.
        self.find_product(product_id).await
    }

    async fn set_product_stock(
        &mut self,
        product_id: i64,
        quantity_in_stock: i32,
    ) -> Result<Product, StoreError> {
        non_negative_stock(quantity_in_stock)?;
        let product = self
            .working
            .product_mut(product_id)
            .ok_or_else(|| missing_reference("product", product_id))?;
        product.quantity_in_stock = quantity_in_stock;
        Ok(product.clone())
    }

    async fn products_with_deliveries(
        &mut self,
        window: DeliveryWindow,
    ) -> Result<Vec<ProductDelivery>, StoreError> {
        let t = &self.working;
        let mut matched: Vec<&Delivery> = t
            .deliveries
            .iter()
            .filter(|d| window.contains(d.delivery_date_time))
            .collect();
        matched.sort_by_key(|d| (d.delivery_date_time, d.delivery_id));

        let rows = matched
            .into_iter()
            .filter_map(|d| {
                t.products.iter().find(|p| p.product_id == d.product_id).map(|p| ProductDelivery {
                    product: p.clone(),
                    delivery_date_time: d.delivery_date_time,
                    delivered_by: d.delivered_by.clone(),
                    recipient_name: d.recipient_name.clone(),
                    recipient_contact: d.recipient_contact.clone(),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn insert_delivery(&mut self, delivery: &NewDelivery) -> Result<Delivery, StoreError> {
        let t = &mut self.working;
        t.require_product(delivery.product_id)?;
        if let Some(order_id) = delivery.order_id {
            t.require_order(order_id)?;
        }

        let row = Delivery {
            delivery_id: next_id(&mut t.seq.delivery),
            product_id: delivery.product_id,
            order_id: delivery.order_id,
            delivery_date_time: delivery.delivery_date_time,
            delivered_by: delivery.delivered_by.clone(),
            recipient_name: delivery.recipient_name.clone(),
            recipient_contact: delivery.recipient_contact.clone(),
        };
        t.deliveries.push(row.clone());
        Ok(row)
    }

    async fn insert_warehouse_entry(
        &mut self,
        entry: &NewWarehouseEntry,
    ) -> Result<WarehouseEntry, StoreError> {
        let t = &mut self.working;
        t.require_product(entry.product_id)?;
        t.require_warehouse(entry.warehouse_id)?;

        let row = WarehouseEntry {
            entry_id: next_id(&mut t.seq.entry),
            product_id: entry.product_id,
            entry_date_time: entry.entry_date_time,
            quantity_entered: entry.quantity_entered,
            entered_by: entry.entered_by.clone(),
            historical: entry.historical,
            warehouse_id: entry.warehouse_id,
        };
        t.entries.push(row.clone());
        Ok(row)
    }

    async fn insert_warehouse_exit(
        &mut self,
        exit: &NewWarehouseExit,
    ) -> Result<WarehouseExit, StoreError> {
        let t = &mut self.working;
        t.require_product(exit.product_id)?;
        t.require_warehouse(exit.warehouse_id)?;

        let row = WarehouseExit {
            exit_id: next_id(&mut t.seq.exit),
            product_id: exit.product_id,
            exit_date_time: exit.exit_date_time,
            quantity_exited: exit.quantity_exited,
            exited_by: exit.exited_by.clone(),
            recipient_name: exit.recipient_name.clone(),
            recipient_contact: exit.recipient_contact.clone(),
            historical: exit.historical,
            warehouse_id: exit.warehouse_id,
        };
        t.exits.push(row.clone());
        Ok(row)
    }

    async fn warehouse_entries_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<WarehouseEntry>, StoreError> {
        Ok(self.working.entries.iter().filter(|e| e.product_id == product_id).cloned().collect())
    }

    async fn warehouse_exits_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<WarehouseExit>, StoreError> {
        Ok(self.working.exits.iter().filter(|e| e.product_id == product_id).cloned().collect())
    }

    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let t = &mut self.working;
        t.require_product(transaction.product_id)?;

        let row = Transaction {
            transaction_id: next_id(&mut t.seq.transaction),
            transaction_date_time: transaction.transaction_date_time,
            product_id: transaction.product_id,
            transaction_type: transaction.transaction_type,
            quantity: transaction.quantity,
            related_id: transaction.related_id,
            transaction_description: transaction.transaction_description.clone(),
        };
        t.transactions.push(row.clone());
        Ok(row)
    }

    async fn transactions_for_product(
        &mut self,
        product_id: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .working
            .transactions
            .iter()
            .filter(|tx| tx.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn insert_category(&mut self, category: &NewCategory) -> Result<Category, StoreError> {
        let t = &mut self.working;
        let row = Category {
            category_id: next_id(&mut t.seq.category),
            category_name: category.category_name.clone(),
        };
        t.categories.push(row.clone());
        Ok(row)
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        Ok(self.working.categories.clone())
    }

    async fn insert_supplier(&mut self, supplier: &NewSupplier) -> Result<Supplier, StoreError> {
        let t = &mut self.working;
        let row = Supplier {
            supplier_id: next_id(&mut t.seq.supplier),
            supplier_name: supplier.supplier_name.clone(),
            contact_information: supplier.contact_information.clone(),
            address: supplier.address.clone(),
        };
        t.suppliers.push(row.clone());
        Ok(row)
    }

    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, StoreError> {
        Ok(self.working.suppliers.clone())
    }

    async fn insert_warehouse(
        &mut self,
        warehouse: &NewWarehouse,
    ) -> Result<Warehouse, StoreError> {
        let t = &mut self.working;
        let row = Warehouse {
            warehouse_id: next_id(&mut t.seq.warehouse),
            location_name: warehouse.location_name.clone(),
            address: warehouse.address.clone(),
            contact_information: warehouse.contact_information.clone(),
        };
        t.warehouses.push(row.clone());
        Ok(row)
    }

    async fn list_warehouses(&mut self) -> Result<Vec<Warehouse>, StoreError> {
        Ok(self.working.warehouses.clone())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order, StoreError> {
        let t = &mut self.working;
        let row = Order {
            order_id: next_id(&mut t.seq.order),
            order_date: order.order_date,
            customer_name: order.customer_name.clone(),
            customer_contact: order.customer_contact.clone(),
            total_amount: order.total_amount,
        };
        t.orders.push(row.clone());
        Ok(row)
    }

    async fn insert_order_detail(
        &mut self,
        detail: &NewOrderDetail,
    ) -> Result<OrderDetail, StoreError> {
        let t = &mut self.working;
        t.require_order(detail.order_id)?;
        t.require_product(detail.product_id)?;
        if detail.quantity <= 0 {
            return Err(StoreError::Constraint(format!(
                "order detail quantity must be > 0, got {}",
                detail.quantity
            )));
        }

        let row = OrderDetail {
            order_detail_id: next_id(&mut t.seq.order_detail),
            order_id: detail.order_id,
            product_id: detail.product_id,
            quantity: detail.quantity,
            subtotal: detail.subtotal,
        };
        t.order_details.push(row.clone());
        Ok(row)
    }

    async fn find_order(&mut self, order_id: i64) -> Result<Option<Order>, StoreError> {
        Ok(self.working.orders.iter().find(|o| o.order_id == order_id).cloned())
    }

    async fn order_details(&mut self, order_id: i64) -> Result<Vec<OrderDetail>, StoreError> {
        Ok(self
            .working
            .order_details
            .iter()
            .filter(|d| d.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list_orders(&mut self) -> Result<Vec<Order>, StoreError> {
        Ok(self.working.orders.clone())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    async fn seed_references(uow: &mut dyn UnitOfWork) -> (i64, i64, i64) {
        let c = uow
            .insert_category(&NewCategory { category_name: "Dairy".into() })
            .await
            .unwrap();
        let s = uow
            .insert_supplier(&NewSupplier {
                supplier_name: "Acme".into(),
                contact_information: "acme@example.com".into(),
                address: "1 Road".into(),
            })
            .await
            .unwrap();
        let w = uow
            .insert_warehouse(&NewWarehouse {
                location_name: "North".into(),
                address: "2 Road".into(),
                contact_information: "north@example.com".into(),
            })
            .await
            .unwrap();
        (c.category_id, s.supplier_id, w.warehouse_id)
    }

    fn new_product(category_id: i64, supplier_id: i64, warehouse_id: i64) -> NewProduct {
        NewProduct {
            product_name: "Milk".into(),
            description: "1L".into(),
            category_id,
            supplier_id,
            quantity_in_stock: 10,
            date_added: ts(1),
            warehouse_id,
            unit_price: 1.5,
        }
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_later_units() {
        let store = MemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        let (c, s, w) = seed_references(uow.as_mut()).await;
        let product = uow.insert_product(&new_product(c, s, w)).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let found = uow.find_product(product.product_id).await.unwrap();
        assert_eq!(found, Some(product));
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = MemoryLedgerStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            seed_references(uow.as_mut()).await;
        }

        let mut uow = store.begin().await.unwrap();
        assert!(uow.list_categories().await.unwrap().is_empty());
        assert!(uow.list_warehouses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn product_requires_existing_references() {
        let store = MemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        let (c, s, _) = seed_references(uow.as_mut()).await;

        let err = uow.insert_product(&new_product(c, s, 999)).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn stock_cannot_be_set_negative() {
        let store = MemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        let (c, s, w) = seed_references(uow.as_mut()).await;
        let product = uow.insert_product(&new_product(c, s, w)).await.unwrap();

        let err = uow.set_product_stock(product.product_id, -1).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        let unchanged = uow.find_product(product.product_id).await.unwrap().unwrap();
        assert_eq!(unchanged.quantity_in_stock, 10);
    }

    #[tokio::test]
    async fn join_orders_by_delivery_time() {
        let store = MemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        let (c, s, w) = seed_references(uow.as_mut()).await;
        let product = uow.insert_product(&new_product(c, s, w)).await.unwrap();
        for day in [3, 1, 2] {
            uow.insert_delivery(&NewDelivery {
                product_id: product.product_id,
                order_id: None,
                delivery_date_time: ts(day),
                delivered_by: format!("driver-{day}"),
                recipient_name: "Dock".into(),
                recipient_contact: "dock@example.com".into(),
            })
            .await
            .unwrap();
        }

        let rows = uow
            .products_with_deliveries(DeliveryWindow { start: Some(ts(2)), end: None })
            .await
            .unwrap();
        let drivers: Vec<_> = rows.iter().map(|r| r.delivered_by.as_str()).collect();
        assert_eq!(drivers, vec!["driver-2", "driver-3"]);
    }

    #[tokio::test]
    async fn units_of_work_are_serialized() {
        let store = MemoryLedgerStore::new();
        let first = store.begin().await.unwrap();

        let contender = store.clone();
        let waiting = tokio::spawn(async move { contender.begin().await.map(|_| ()) });
        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());

        drop(first);
        waiting.await.unwrap().unwrap();
    }
}
