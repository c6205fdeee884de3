//! Product type endpoints

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
use crate::models::{NewProductType, ProductType, ProductTypePatch};

/// Create product type request
#[derive(Deserialize)]
pub struct CreateProductTypeRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

async fn create_product_type(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateProductTypeRequest>,
) -> ApiResult<ProductType> {
    let new = NewProductType::new(req.kind)?;
    let product_type = state.store.create_product_type(new).await?;

    tracing::debug!(id = product_type.id, "product type created");
    Ok(created("ProductType created successfully", product_type))
}

async fn list_product_types(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ProductType>> {
    let types = state.store.list_product_types().await?;
    Ok(ok("ProductTypes retrieved successfully", types))
}

async fn update_product_type(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<ProductTypePatch>,
) -> ApiResult<ProductType> {
    let product_type = state
        .store
        .update_product_type(id, patch.validate()?)
        .await?;
    Ok(updated("ProductType", product_type))
}

async fn delete_product_type(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> ApiResult<()> {
    let outcome = state.store.delete_product_type(id).await?;
    Ok(deleted("ProductType", outcome))
}

/// Product type routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/product-types",
            get(list_product_types).post(create_product_type),
        )
        .route(
            "/product-types/{id}",
            put(update_product_type).delete(delete_product_type),
        )
}
