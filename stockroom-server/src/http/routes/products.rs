//! Product endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use crate::http::envelope::{created, deleted, ok, updated, ApiResult};
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{NewProduct, Product, ProductPatch, ProductWithType};

/// Create product request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub stock: Option<i32>,
    pub product_type_id: Option<i32>,
}

/// POST /products
async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateProductRequest>,
) -> ApiResult<Product> {
    let new = NewProduct::new(req.name, req.stock, req.product_type_id)?;
    let product = state.store.create_product(new).await?;

    tracing::debug!(id = product.id, "product created");
    Ok(created("Product created successfully", product))
}

/// GET /products - every product joined with its type
async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ProductWithType>> {
    let products = state.store.list_products().await?;
    Ok(ok("Products retrieved successfully", products))
}

/// PUT /products/{id}
async fn update_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<ProductPatch>,
) -> ApiResult<ProductWithType> {
    let product = state.store.update_product(id, patch.validate()?).await?;
    Ok(updated("Product", product))
}

/// DELETE /products/{id}
async fn delete_product(State(state): State<Arc<AppState>>, ValidId(id): ValidId) -> ApiResult<()> {
    let outcome = state.store.delete_product(id).await?;
    Ok(deleted("Product", outcome))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
}
