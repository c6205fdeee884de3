//! Store contract shared by the Postgres and in-memory backends
//!
//! Handlers only see `dyn Store`, so tests can run the full HTTP stack
//! without a database.

use async_trait::async_trait;

use crate::models::{
    DateRange, NewProduct, NewProductType, NewTransaction, Product, ProductPatch,
    ProductType, ProductTypePatch, ProductWithType, Transaction, TransactionFilter,
    TransactionPatch, TransactionWithProduct,
};
use crate::sales::SoldSummary;

/// Store-level error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Constraint the in-memory store enforces itself (Postgres reports these as `Sqlx`)
    #[error("conflict on {resource}: {reason}")]
    Conflict { resource: &'static str, reason: String },
}

/// Result of deleting by id; both outcomes are successes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Absent,
}

impl DeleteOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            Self::Deleted
        } else {
            Self::Absent
        }
    }
}

/// Persistence operations used by the HTTP handlers.
///
/// Lists are ordered by id. Updates return `Ok(None)` when no row
/// matches; the HTTP layer reports that as a success with `data: null`.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Short backend label reported by `/health`
    fn backend(&self) -> &'static str;

    async fn create_product_type(&self, new: NewProductType) -> Result<ProductType, DbError>;
    async fn list_product_types(&self) -> Result<Vec<ProductType>, DbError>;
    async fn update_product_type(
        &self,
        id: i32,
        patch: ProductTypePatch,
    ) -> Result<Option<ProductType>, DbError>;
    async fn delete_product_type(&self, id: i32) -> Result<DeleteOutcome, DbError>;

    async fn create_product(&self, new: NewProduct) -> Result<Product, DbError>;
    async fn list_products(&self) -> Result<Vec<ProductWithType>, DbError>;
    async fn update_product(
        &self,
        id: i32,
        patch: ProductPatch,
    ) -> Result<Option<ProductWithType>, DbError>;
    async fn delete_product(&self, id: i32) -> Result<DeleteOutcome, DbError>;

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, DbError>;
    async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionWithProduct>, DbError>;
    async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Option<TransactionWithProduct>, DbError>;
    async fn delete_transaction(&self, id: i32) -> Result<DeleteOutcome, DbError>;

    /// Per-product sales totals, optionally restricted to `range`.
    async fn sold_summary(&self, range: Option<DateRange>) -> Result<Vec<SoldSummary>, DbError>;
}
