use axum::{routing::get, Router};

use crate::handlers::reference::{
    create_category, create_supplier, create_warehouse, list_categories, list_suppliers,
    list_warehouses,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(list_categories).post(create_category))
        .route("/suppliers/", get(list_suppliers).post(create_supplier))
        .route("/warehouses/", get(list_warehouses).post(create_warehouse))
}
