use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Order header. `total_amount` is whatever the caller supplied; it is never
/// recomputed from the line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i64,
    pub order_date: NaiveDateTime,
    pub customer_name: String,
    pub customer_contact: String,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_date: NaiveDateTime,
    pub customer_name: String,
    pub customer_contact: String,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderDetail {
    pub order_detail_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderDetail {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: f64,
}

/// Line item as submitted with a new order, before the header id exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: f64,
}
