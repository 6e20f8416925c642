// src/dtos/product.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::{require_non_negative, require_text};
use crate::error::AppError;
use crate::models::product::NewProduct;
use crate::services::inventory::DeliveryDetails;
use crate::store::DeliveryWindow;

#[derive(Debug, Deserialize)]
pub struct ProductFields {
    pub product_name: String,
    pub description: String,
    pub category_id: i64,
    pub supplier_id: i64,
    pub quantity_in_stock: i32,
    pub date_added: NaiveDateTime,
    pub warehouse_id: i64,
    pub unit_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryInfo {
    pub delivery_date_time: NaiveDateTime,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

/// Body of `POST /products/`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product: ProductFields,
    pub delivery_info: DeliveryInfo,
}

impl CreateProductRequest {
    pub fn into_parts(self) -> Result<(NewProduct, DeliveryDetails), AppError> {
        let CreateProductRequest { product, delivery_info } = self;

        require_text("product_name", &product.product_name)?;
        require_non_negative("unit_price", product.unit_price)?;
        if product.quantity_in_stock < 0 {
            return Err(AppError::validation("quantity_in_stock must be >= 0"));
        }
        require_text("delivered_by", &delivery_info.delivered_by)?;
        require_text("recipient_name", &delivery_info.recipient_name)?;

        Ok((
            NewProduct {
                product_name: product.product_name,
                description: product.description,
                category_id: product.category_id,
                supplier_id: product.supplier_id,
                quantity_in_stock: product.quantity_in_stock,
                date_added: product.date_added,
                warehouse_id: product.warehouse_id,
                unit_price: product.unit_price,
            },
            DeliveryDetails {
                delivery_date_time: delivery_info.delivery_date_time,
                delivered_by: delivery_info.delivered_by,
                recipient_name: delivery_info.recipient_name,
                recipient_contact: delivery_info.recipient_contact,
            },
        ))
    }
}

/// Query string of `GET /products/`. Both bounds are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsByDateQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum BoundSide {
    Start,
    End,
}

impl ProductsByDateQuery {
    pub fn window(&self) -> Result<DeliveryWindow, AppError> {
        Ok(DeliveryWindow {
            start: parse_bound("start_date", self.start_date.as_deref(), BoundSide::Start)?,
            end: parse_bound("end_date", self.end_date.as_deref(), BoundSide::End)?,
        })
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Accepts RFC 3339, a naive ISO datetime or a bare date. A bare date covers
/// the whole day: midnight as a start bound, the last microsecond as an end
/// bound.
fn parse_bound(
    field: &str,
    raw: Option<&str>,
    side: BoundSide,
) -> Result<Option<NaiveDateTime>, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.naive_utc()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match side {
            BoundSide::Start => NaiveTime::from_hms_opt(0, 0, 0),
            BoundSide::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999),
        }
        .ok_or_else(|| AppError::internal("invalid day boundary"))?;
        return Ok(Some(date.and_time(time)));
    }

    Err(AppError::validation(format!("{field} is not a valid date or datetime: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: Option<&str>, end: Option<&str>) -> ProductsByDateQuery {
        ProductsByDateQuery {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn missing_and_empty_bounds_are_open() {
        assert_eq!(query(None, None).window().unwrap(), DeliveryWindow::default());
        assert_eq!(query(Some(""), Some(" ")).window().unwrap(), DeliveryWindow::default());
    }

    #[test]
    fn bare_dates_cover_the_whole_day() {
        let window = query(Some("2024-02-01"), Some("2024-02-03")).window().unwrap();
        assert_eq!(window.start, Some(dt("2024-02-01 00:00:00")));
        assert_eq!(window.end, Some(dt("2024-02-03 23:59:59.999999")));
    }

    #[test]
    fn datetimes_are_accepted_in_several_shapes() {
        let window = query(Some("2024-02-01T08:30:00"), Some("2024-02-02T10:00:00+02:00"))
            .window()
            .unwrap();
        assert_eq!(window.start, Some(dt("2024-02-01 08:30:00")));
        assert_eq!(window.end, Some(dt("2024-02-02 08:00:00")));

        let window = query(Some("2024-02-01 08:30"), None).window().unwrap();
        assert_eq!(window.start, Some(dt("2024-02-01 08:30:00")));
    }

    #[test]
    fn garbage_bound_is_a_validation_error() {
        let err = query(Some("yesterday"), None).window().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn create_request_rejects_negative_stock() {
        let body = serde_json::json!({
            "product": {
                "product_name": "Soap",
                "description": "bar",
                "category_id": 1,
                "supplier_id": 1,
                "quantity_in_stock": -1,
                "date_added": "2024-01-01T00:00:00",
                "warehouse_id": 1,
                "unit_price": 0.5
            },
            "delivery_info": {
                "delivery_date_time": "2024-01-01T00:00:00",
                "delivered_by": "van",
                "recipient_name": "dock",
                "recipient_contact": "dock@example.com"
            }
        });
        let req: CreateProductRequest = serde_json::from_value(body).unwrap();
        assert!(matches!(req.into_parts(), Err(AppError::ValidationError(_))));
    }
}
