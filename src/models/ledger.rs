//! Immutable movement records and the unified transaction timeline.
//!
//! Rows in this module are written once, in the same unit of work as the
//! stock change they justify, and never updated afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Delivery {
    pub delivery_id: i64,
    pub product_id: i64,
    pub order_id: Option<i64>,
    pub delivery_date_time: NaiveDateTime,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub product_id: i64,
    pub order_id: Option<i64>,
    pub delivery_date_time: NaiveDateTime,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WarehouseEntry {
    pub entry_id: i64,
    pub product_id: i64,
    pub entry_date_time: NaiveDateTime,
    pub quantity_entered: i32,
    pub entered_by: String,
    pub historical: bool,
    pub warehouse_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWarehouseEntry {
    pub product_id: i64,
    pub entry_date_time: NaiveDateTime,
    pub quantity_entered: i32,
    pub entered_by: String,
    pub historical: bool,
    pub warehouse_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WarehouseExit {
    pub exit_id: i64,
    pub product_id: i64,
    pub exit_date_time: NaiveDateTime,
    pub quantity_exited: i32,
    pub exited_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
    pub historical: bool,
    pub warehouse_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWarehouseExit {
    pub product_id: i64,
    pub exit_date_time: NaiveDateTime,
    pub quantity_exited: i32,
    pub exited_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
    pub historical: bool,
    pub warehouse_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Addition, // Initial stock recorded when the product is created
    Entry,    // Stock entered into a warehouse outside of a delivery
    Exit,     // Stock taken out of a warehouse
    Delivery, // Stock received through a delivery
}

impl TransactionType {
    /// Sign this kind of transaction contributes to a product's stock level.
    pub fn stock_sign(self) -> i64 {
        match self {
            TransactionType::Addition | TransactionType::Entry | TransactionType::Delivery => 1,
            TransactionType::Exit => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub transaction_id: i64,
    pub transaction_date_time: NaiveDateTime,
    pub product_id: i64,
    pub transaction_type: TransactionType,
    pub quantity: i32,
    pub related_id: i64,
    pub transaction_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_date_time: NaiveDateTime,
    pub product_id: i64,
    pub transaction_type: TransactionType,
    pub quantity: i32,
    pub related_id: i64,
    pub transaction_description: Option<String>,
}
