use axum::{extract::State, http::StatusCode, Json};
use tracing::instrument;

use crate::dtos::reference::{CreateCategoryRequest, CreateSupplierRequest, CreateWarehouseRequest};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::models::reference::{Category, NewCategory, NewSupplier, NewWarehouse, Supplier, Warehouse};
use crate::services::reference;
use crate::state::AppState;

#[instrument(skip(store, req))]
pub async fn create_category(
    State(AppState { store }): State<AppState>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = NewCategory::try_from(req)?;
    let mut uow = store.begin().await?;
    let created = reference::create_category(uow.as_mut(), category).await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_categories(
    State(AppState { store }): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let mut uow = store.begin().await?;
    Ok(Json(reference::list_categories(uow.as_mut()).await?))
}

#[instrument(skip(store, req))]
pub async fn create_supplier(
    State(AppState { store }): State<AppState>,
    ApiJson(req): ApiJson<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let supplier = NewSupplier::try_from(req)?;
    let mut uow = store.begin().await?;
    let created = reference::create_supplier(uow.as_mut(), supplier).await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_suppliers(
    State(AppState { store }): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    let mut uow = store.begin().await?;
    Ok(Json(reference::list_suppliers(uow.as_mut()).await?))
}

#[instrument(skip(store, req))]
pub async fn create_warehouse(
    State(AppState { store }): State<AppState>,
    ApiJson(req): ApiJson<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<Warehouse>), AppError> {
    let warehouse = NewWarehouse::try_from(req)?;
    let mut uow = store.begin().await?;
    let created = reference::create_warehouse(uow.as_mut(), warehouse).await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_warehouses(
    State(AppState { store }): State<AppState>,
) -> Result<Json<Vec<Warehouse>>, AppError> {
    let mut uow = store.begin().await?;
    Ok(Json(reference::list_warehouses(uow.as_mut()).await?))
}
