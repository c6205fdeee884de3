//! Transaction endpoints, including the sorted-sold summary

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::http::envelope::{created, deleted, ok, updated, ApiResult};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{
    DateRange, NewTransaction, Transaction, TransactionFilter, TransactionPatch,
    TransactionWithProduct, ValidationError,
};
use crate::sales::SoldSummary;

/// Create transaction request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub quantity_sold: Option<i32>,
    pub product_id: Option<i32>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Date window query (`?startDate=..&endDate=..`)
///
/// The window only applies when both bounds are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindowParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateWindowParams {
    fn range(&self) -> Result<Option<DateRange>, ValidationError> {
        DateRange::from_bounds(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// List filters (`?productId=..&startDate=..&endDate=..`)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    pub product_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListTransactionsParams {
    fn filter(&self) -> Result<TransactionFilter, ValidationError> {
        Ok(TransactionFilter {
            product_id: self.product_id,
            range: DateRange::from_bounds(self.start_date.as_deref(), self.end_date.as_deref())?,
        })
    }
}

/// POST /transactions
async fn create_transaction(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateTransactionRequest>,
) -> ApiResult<Transaction> {
    let new = NewTransaction::new(req.quantity_sold, req.product_id, req.transaction_date)?;
    let transaction = state.store.create_transaction(new).await?;

    tracing::debug!(
        id = transaction.id,
        product_id = transaction.product_id,
        "transaction created"
    );
    Ok(created("Transaction created successfully", transaction))
}

/// GET /transactions
async fn list_transactions(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ListTransactionsParams>,
) -> ApiResult<Vec<TransactionWithProduct>> {
    let transactions = state.store.list_transactions(params.filter()?).await?;
    Ok(ok("Transactions retrieved successfully", transactions))
}

/// PUT /transactions/{id}
async fn update_transaction(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(patch): ValidJson<TransactionPatch>,
) -> ApiResult<TransactionWithProduct> {
    let transaction = state.store.update_transaction(id, patch).await?;
    Ok(updated("Transaction", transaction))
}

/// DELETE /transactions/{id}
async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> ApiResult<()> {
    let outcome = state.store.delete_transaction(id).await?;
    Ok(deleted("Transaction", outcome))
}

/// GET /transactions/sorted-sold - per-product totals, best seller first
async fn sorted_sold(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<DateWindowParams>,
) -> ApiResult<Vec<SoldSummary>> {
    let range = params.range()?;
    let summary = state.store.sold_summary(range).await?;

    tracing::debug!(rows = summary.len(), windowed = range.is_some(), "sold summary");
    Ok(ok("Transaction retrieved successfully", summary))
}

/// Transaction routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/sorted-sold", get(sorted_sold))
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bound_means_no_window() {
        let params = DateWindowParams {
            start_date: Some("2024-01-01".into()),
            end_date: None,
        };
        assert_eq!(params.range().unwrap(), None);
    }

    #[test]
    fn bad_bound_is_rejected() {
        let params = DateWindowParams {
            start_date: Some("yesterday".into()),
            end_date: Some("2024-01-01".into()),
        };
        assert!(params.range().is_err());
    }
}
