//! `Store` backed by PostgreSQL repositories

use async_trait::async_trait;
use sqlx::PgPool;

use super::repos::{ProductRepo, ProductTypeRepo, TransactionRepo};
use super::store::{DbError, DeleteOutcome, Store};
use crate::models::{
    DateRange, NewProduct, NewProductType, NewTransaction, Product, ProductPatch,
    ProductType, ProductTypePatch, ProductWithType, Transaction, TransactionFilter,
    TransactionPatch, TransactionWithProduct,
};
use crate::sales::SoldSummary;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_product_type(&self, new: NewProductType) -> Result<ProductType, DbError> {
        ProductTypeRepo::new(&self.pool).create(new).await
    }

    async fn list_product_types(&self) -> Result<Vec<ProductType>, DbError> {
        ProductTypeRepo::new(&self.pool).list().await
    }

    async fn update_product_type(
        &self,
        id: i32,
        patch: ProductTypePatch,
    ) -> Result<Option<ProductType>, DbError> {
        ProductTypeRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_product_type(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        ProductTypeRepo::new(&self.pool).delete(id).await
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).create(new).await
    }

    async fn list_products(&self) -> Result<Vec<ProductWithType>, DbError> {
        ProductRepo::new(&self.pool).list().await
    }

    async fn update_product(
        &self,
        id: i32,
        patch: ProductPatch,
    ) -> Result<Option<ProductWithType>, DbError> {
        ProductRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_product(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        ProductRepo::new(&self.pool).delete(id).await
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, DbError> {
        TransactionRepo::new(&self.pool).create(new).await
    }

    async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionWithProduct>, DbError> {
        TransactionRepo::new(&self.pool).list(filter).await
    }

    async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Option<TransactionWithProduct>, DbError> {
        TransactionRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_transaction(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        TransactionRepo::new(&self.pool).delete(id).await
    }

    async fn sold_summary(&self, range: Option<DateRange>) -> Result<Vec<SoldSummary>, DbError> {
        TransactionRepo::new(&self.pool).sold_summary(range).await
    }
}
