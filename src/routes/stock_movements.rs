use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::stock_movement;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/{product_id}/exit/", post(stock_movement::exit_product))
        .route("/products/{product_id}/deliver/", post(stock_movement::deliver_product))
        .route("/products/{product_id}/transactions/", get(stock_movement::get_product_transactions))
        .route("/products/{product_id}/movements/", get(stock_movement::get_product_movements))
        .route("/products/{product_id}/audit/", get(stock_movement::get_stock_audit))
}
