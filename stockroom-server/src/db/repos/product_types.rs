//! Product type repository

use sqlx::PgPool;

use crate::db::store::{DbError, DeleteOutcome};
use crate::models::{NewProductType, ProductType, ProductTypePatch};

/// Product type repository
pub struct ProductTypeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductTypeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewProductType) -> Result<ProductType, DbError> {
        let created: ProductType = sqlx::query_as(
            r#"
            INSERT INTO product_types ("type")
            VALUES ($1)
            RETURNING id, "type", created_at, updated_at
            "#,
        )
        .bind(&new.kind)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<ProductType>, DbError> {
        let types: Vec<ProductType> = sqlx::query_as(
            r#"
            SELECT id, "type", created_at, updated_at
            FROM product_types
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(types)
    }

    /// Merge `patch` onto the row; `None` when the id is unknown.
    pub async fn update(
        &self,
        id: i32,
        patch: ProductTypePatch,
    ) -> Result<Option<ProductType>, DbError> {
        let row = sqlx::query_as(
            r#"
            UPDATE product_types
            SET "type" = COALESCE($2, "type"),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, "type", created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.kind.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete by id (idempotent). Products pointing at it are untyped by the FK.
    pub async fn delete(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        let result = sqlx::query("DELETE FROM product_types WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(DeleteOutcome::from_rows_affected(result.rows_affected()))
    }
}
