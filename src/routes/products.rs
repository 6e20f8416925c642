use axum::{routing::get, Router};

use crate::handlers::product::{create_product, get_product, get_products_by_dates};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(get_products_by_dates).post(create_product))
        .route("/products/{product_id}", get(get_product))
}
