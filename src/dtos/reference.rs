use serde::Deserialize;

use super::require_text;
use crate::error::AppError;
use crate::models::reference::{NewCategory, NewSupplier, NewWarehouse};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

impl TryFrom<CreateCategoryRequest> for NewCategory {
    type Error = AppError;

    fn try_from(req: CreateCategoryRequest) -> Result<Self, Self::Error> {
        require_text("category_name", &req.category_name)?;
        Ok(NewCategory { category_name: req.category_name })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    pub supplier_name: String,
    pub contact_information: String,
    pub address: String,
}

impl TryFrom<CreateSupplierRequest> for NewSupplier {
    type Error = AppError;

    fn try_from(req: CreateSupplierRequest) -> Result<Self, Self::Error> {
        require_text("supplier_name", &req.supplier_name)?;
        Ok(NewSupplier {
            supplier_name: req.supplier_name,
            contact_information: req.contact_information,
            address: req.address,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWarehouseRequest {
    pub location_name: String,
    pub address: String,
    pub contact_information: String,
}

impl TryFrom<CreateWarehouseRequest> for NewWarehouse {
    type Error = AppError;

    fn try_from(req: CreateWarehouseRequest) -> Result<Self, Self::Error> {
        require_text("location_name", &req.location_name)?;
        Ok(NewWarehouse {
            location_name: req.location_name,
            address: req.address,
            contact_information: req.contact_information,
        })
    }
}
