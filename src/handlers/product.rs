// src/handlers/product.rs
use axum::{
    extract::State,
    Json,
};
use tracing::instrument;

use crate::dtos::product::{CreateProductRequest, ProductsByDateQuery};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::product::{Product, ProductDelivery};
use crate::services::{inventory, query};
use crate::state::AppState;

// POST /products/ - Create product with its intake delivery
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let (product, intake) = payload.into_parts()?;

    let mut uow = state.store.begin().await?;
    let created = inventory::create_product(uow.as_mut(), product, intake).await?;
    uow.commit().await?;

    Ok(Json(created))
}

// GET /products/?start_date=&end_date= - Products merged with deliveries in range
#[instrument(skip(state))]
pub async fn get_products_by_dates(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductsByDateQuery>,
) -> Result<Json<Vec<ProductDelivery>>, AppError> {
    let window = params.window()?;

    let mut uow = state.store.begin().await?;
    let rows = query::list_products_by_delivery_date(uow.as_mut(), window).await?;

    Ok(Json(rows))
}

// GET /products/{product_id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    ApiPath(product_id): ApiPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<Product>, AppError> {
    let mut uow = state.store.begin().await?;
    let product = query::get_product(uow.as_mut(), product_id).await?;

    Ok(Json(product))
}
