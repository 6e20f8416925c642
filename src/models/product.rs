use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub description: String,
    pub category_id: i64,
    pub supplier_id: i64,
    pub quantity_in_stock: i32,
    pub date_added: NaiveDateTime,
    pub warehouse_id: i64,
    pub unit_price: f64,
}

/// Attributes of a product that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_name: String,
    pub description: String,
    pub category_id: i64,
    pub supplier_id: i64,
    pub quantity_in_stock: i32,
    pub date_added: NaiveDateTime,
    pub warehouse_id: i64,
    pub unit_price: f64,
}

/// A product merged with one of its deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProductDelivery {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub delivery_date_time: NaiveDateTime,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}
