//! Route handlers organized by resource

pub mod health;
pub mod product_types;
pub mod products;
pub mod transactions;

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

/// Resource routes, mounted under `/api`
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(products::router())
        .merge(product_types::router())
        .merge(transactions::router())
}
