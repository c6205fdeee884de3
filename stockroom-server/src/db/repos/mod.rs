//! Postgres repositories, one per table
//!
//! - Joined lists are a single query (LEFT JOIN for the optional type)
//! - Foreign keys are left to the database; violations surface as `DbError::Sqlx`
//! - Updates merge with COALESCE and return `None` for a missing id

pub mod product_types;
pub mod products;
pub mod transactions;

pub use product_types::ProductTypeRepo;
pub use products::ProductRepo;
pub use transactions::TransactionRepo;

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::{Product, ProductType, ProductWithType};

/// Product + type columns, aliased so one row mapper serves every join.
/// Expects `products p LEFT JOIN product_types pt`.
pub(crate) const JOINED_PRODUCT_COLUMNS: &str = r#"
    p.id AS p_id, p.name AS p_name, p.stock AS p_stock,
    p.product_type_id AS p_product_type_id,
    p.created_at AS p_created_at, p.updated_at AS p_updated_at,
    pt.id AS pt_id, pt."type" AS pt_type,
    pt.created_at AS pt_created_at, pt.updated_at AS pt_updated_at
"#;

/// Map the `p_*` / `pt_*` columns of a row.
pub(crate) fn joined_product(row: &PgRow) -> Result<ProductWithType, sqlx::Error> {
    let product_type = match row.try_get::<Option<i32>, _>("pt_id")? {
        Some(id) => Some(ProductType {
            id,
            kind: row.try_get("pt_type")?,
            created_at: row.try_get("pt_created_at")?,
            updated_at: row.try_get("pt_updated_at")?,
        }),
        None => None,
    };

    Ok(ProductWithType {
        product: Product {
            id: row.try_get("p_id")?,
            name: row.try_get("p_name")?,
            stock: row.try_get("p_stock")?,
            product_type_id: row.try_get("p_product_type_id")?,
            created_at: row.try_get("p_created_at")?,
            updated_at: row.try_get("p_updated_at")?,
        },
        product_type,
    })
}
