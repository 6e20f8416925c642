use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub contact_information: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub supplier_name: String,
    pub contact_information: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Warehouse {
    pub warehouse_id: i64,
    pub location_name: String,
    pub address: String,
    pub contact_information: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWarehouse {
    pub location_name: String,
    pub address: String,
    pub contact_information: String,
}
