//! Schema bootstrap for the three stockroom tables
//!
//! Idempotent `CREATE ... IF NOT EXISTS`, run once at server start.

use sqlx::PgPool;

/// Create tables and indexes if they don't exist yet
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring stockroom schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_types (
            id SERIAL PRIMARY KEY,
            "type" TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Deleting a type leaves its products untyped
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            stock INTEGER NOT NULL,
            product_type_id INTEGER REFERENCES product_types(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // A product with recorded sales cannot be deleted
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id SERIAL PRIMARY KEY,
            quantity_sold INTEGER NOT NULL,
            product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
            transaction_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Stockroom schema ready");
    Ok(())
}

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_products_type ON products(product_type_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_product ON transactions(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(transaction_date)",
];
