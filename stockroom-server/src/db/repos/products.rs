//! Product repository
//!
//! Lists and updates return the product joined with its type.

use sqlx::PgPool;

use super::{joined_product, JOINED_PRODUCT_COLUMNS};
use crate::db::store::{DbError, DeleteOutcome};
use crate::models::{NewProduct, Product, ProductPatch, ProductWithType};

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewProduct) -> Result<Product, DbError> {
        let product: Product = sqlx::query_as(
            r#"
            INSERT INTO products (name, stock, product_type_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, stock, product_type_id, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(new.stock)
        .bind(new.product_type_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// All products with their type, single query.
    pub async fn list(&self) -> Result<Vec<ProductWithType>, DbError> {
        let sql = format!(
            r#"
            SELECT {JOINED_PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            ORDER BY p.id
            "#
        );

        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        let products = rows
            .iter()
            .map(joined_product)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    pub async fn get(&self, id: i32) -> Result<Option<ProductWithType>, DbError> {
        let sql = format!(
            r#"
            SELECT {JOINED_PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE p.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.as_ref().map(joined_product).transpose()?)
    }

    /// Merge `patch` onto the row and re-fetch it with its type.
    ///
    /// `product_type_id` is only written when the patch carries it, so an
    /// explicit `null` clears the type while an absent field keeps it.
    pub async fn update(
        &self,
        id: i32,
        patch: ProductPatch,
    ) -> Result<Option<ProductWithType>, DbError> {
        let touched: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                stock = COALESCE($3, stock),
                product_type_id = CASE WHEN $4 THEN $5 ELSE product_type_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.stock)
        .bind(patch.product_type_id.is_some())
        .bind(patch.product_type_id.flatten())
        .fetch_optional(self.pool)
        .await?;

        if touched.is_none() {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete by id (idempotent). Fails with a FK violation if sales reference it.
    pub async fn delete(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(DeleteOutcome::from_rows_affected(result.rows_affected()))
    }
}
