use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::dtos::order::CreateOrderRequest;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::order::Order;
use crate::services::reference::{self, OrderWithDetails};
use crate::state::AppState;

#[instrument(skip(store, req))]
pub async fn create_order(
    State(AppState { store }): State<AppState>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderWithDetails>), AppError> {
    let (order, lines) = req.into_parts()?;

    let mut uow = store.begin().await?;
    let created = reference::create_order(uow.as_mut(), order, lines).await?;
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(store))]
pub async fn get_order(
    State(AppState { store }): State<AppState>,
    ApiPath(order_id): ApiPath<i64>,
) -> Result<Json<OrderWithDetails>, AppError> {
    let mut uow = store.begin().await?;
    Ok(Json(reference::get_order(uow.as_mut(), order_id).await?))
}

pub async fn list_orders(
    State(AppState { store }): State<AppState>,
) -> Result<Json<Vec<Order>>, AppError> {
    let mut uow = store.begin().await?;
    Ok(Json(reference::list_orders(uow.as_mut()).await?))
}
