pub mod orders;
pub mod products;
pub mod references;
pub mod stock_movements;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health_check, root};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(products::routes())
        .merge(stock_movements::routes())
        .merge(references::routes())
        .merge(orders::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
