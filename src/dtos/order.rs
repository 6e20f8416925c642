use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{require_non_negative, require_text};
use crate::error::AppError;
use crate::models::order::{NewOrder, OrderLine};

#[derive(Debug, Deserialize)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub order_date: NaiveDateTime,
    pub customer_name: String,
    pub customer_contact: String,
    pub total_amount: f64,
    #[serde(default)]
    pub details: Vec<NewOrderLine>,
}

impl CreateOrderRequest {
    pub fn into_parts(self) -> Result<(NewOrder, Vec<OrderLine>), AppError> {
        require_text("customer_name", &self.customer_name)?;
        require_non_negative("total_amount", self.total_amount)?;
        for line in &self.details {
            require_non_negative("subtotal", line.subtotal)?;
        }

        let lines = self
            .details
            .into_iter()
            .map(|l| OrderLine { product_id: l.product_id, quantity: l.quantity, subtotal: l.subtotal })
            .collect();
        Ok((
            NewOrder {
                order_date: self.order_date,
                customer_name: self.customer_name,
                customer_contact: self.customer_contact,
                total_amount: self.total_amount,
            },
            lines,
        ))
    }
}
