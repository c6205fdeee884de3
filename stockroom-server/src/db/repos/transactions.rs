//! Transaction repository
//!
//! Also owns the sold-transactions summary: one grouped query over
//! transactions joined to products and product types.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{joined_product, JOINED_PRODUCT_COLUMNS};
use crate::db::store::{DbError, DeleteOutcome};
use crate::models::{
    DateRange, NewTransaction, ProductTypeRef, Transaction, TransactionFilter, TransactionPatch,
    TransactionWithProduct,
};
use crate::sales::{SoldProduct, SoldSummary};

/// Transaction repository
pub struct TransactionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TransactionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewTransaction) -> Result<Transaction, DbError> {
        let created: Transaction = sqlx::query_as(
            r#"
            INSERT INTO transactions (quantity_sold, product_id, transaction_date)
            VALUES ($1, $2, $3)
            RETURNING id, quantity_sold, product_id, transaction_date, created_at, updated_at
            "#,
        )
        .bind(new.quantity_sold)
        .bind(new.product_id)
        .bind(new.transaction_date)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Transactions joined with product and type, filtered, single query.
    pub async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionWithProduct>, DbError> {
        let sql = format!(
            r#"
            SELECT
                t.id, t.quantity_sold, t.product_id, t.transaction_date,
                t.created_at, t.updated_at,
                {JOINED_PRODUCT_COLUMNS}
            FROM transactions t
            JOIN products p ON p.id = t.product_id
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE ($1::INTEGER IS NULL OR t.product_id = $1)
              AND ($2::TIMESTAMPTZ IS NULL OR t.transaction_date BETWEEN $2 AND $3)
            ORDER BY t.id
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(filter.product_id)
            .bind(filter.range.map(|r| r.start))
            .bind(filter.range.map(|r| r.end))
            .fetch_all(self.pool)
            .await?;

        let items = rows
            .iter()
            .map(joined_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub async fn get(&self, id: i32) -> Result<Option<TransactionWithProduct>, DbError> {
        let sql = format!(
            r#"
            SELECT
                t.id, t.quantity_sold, t.product_id, t.transaction_date,
                t.created_at, t.updated_at,
                {JOINED_PRODUCT_COLUMNS}
            FROM transactions t
            JOIN products p ON p.id = t.product_id
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE t.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.as_ref().map(joined_transaction).transpose()?)
    }

    /// Merge `patch` onto the row and re-fetch it with its joins.
    pub async fn update(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Option<TransactionWithProduct>, DbError> {
        let touched: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE transactions
            SET quantity_sold = COALESCE($2, quantity_sold),
                product_id = COALESCE($3, product_id),
                transaction_date = COALESCE($4, transaction_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.quantity_sold)
        .bind(patch.product_id)
        .bind(patch.transaction_date)
        .fetch_optional(self.pool)
        .await?;

        if touched.is_none() {
            return Ok(None);
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(DeleteOutcome::from_rows_affected(result.rows_affected()))
    }

    /// Per-product totals, highest seller first.
    ///
    /// Only grouped columns and aggregates are selected, so no row carries
    /// a stray transaction id.
    pub async fn sold_summary(&self, range: Option<DateRange>) -> Result<Vec<SoldSummary>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id AS product_id,
                p.name,
                p.stock,
                p.product_type_id,
                pt.id AS pt_id,
                pt."type" AS pt_type,
                SUM(t.quantity_sold)::BIGINT AS total_quantity_sold,
                COUNT(*) AS total_quantity_transaction
            FROM transactions t
            JOIN products p ON p.id = t.product_id
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE ($1::TIMESTAMPTZ IS NULL OR t.transaction_date BETWEEN $1 AND $2)
            GROUP BY p.id, pt.id
            ORDER BY total_quantity_sold DESC, p.id ASC
            "#,
        )
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_all(self.pool)
        .await?;

        let summary = rows
            .iter()
            .map(summary_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summary)
    }
}

fn joined_transaction(row: &PgRow) -> Result<TransactionWithProduct, sqlx::Error> {
    Ok(TransactionWithProduct {
        transaction: Transaction {
            id: row.try_get("id")?,
            quantity_sold: row.try_get("quantity_sold")?,
            product_id: row.try_get("product_id")?,
            transaction_date: row.try_get("transaction_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        },
        product: joined_product(row)?,
    })
}

fn summary_row(row: &PgRow) -> Result<SoldSummary, sqlx::Error> {
    let product_id: i32 = row.try_get("product_id")?;
    let product_type = match row.try_get::<Option<i32>, _>("pt_id")? {
        Some(id) => Some(ProductTypeRef {
            id,
            kind: row.try_get("pt_type")?,
        }),
        None => None,
    };

    Ok(SoldSummary {
        product_id,
        total_quantity_sold: row.try_get("total_quantity_sold")?,
        total_quantity_transaction: row.try_get("total_quantity_transaction")?,
        product: SoldProduct {
            id: product_id,
            name: row.try_get("name")?,
            stock: row.try_get("stock")?,
            product_type_id: row.try_get("product_type_id")?,
            product_type,
        },
    })
}
