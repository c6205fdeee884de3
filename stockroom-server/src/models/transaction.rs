//! Sales transaction records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::date_range::DateRange;
use super::product::ProductWithType;
use super::validation::require;
use super::ValidationError;

/// Transaction record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    pub quantity_sold: i32,
    pub product_id: i32,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction joined with its product (and the product's type)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithProduct {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(rename = "Product")]
    pub product: ProductWithType,
}

/// Validated input for recording a sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub quantity_sold: i32,
    pub product_id: i32,
    pub transaction_date: DateTime<Utc>,
}

impl NewTransaction {
    /// A missing `transaction_date` defaults to now.
    pub fn new(
        quantity_sold: Option<i32>,
        product_id: Option<i32>,
        transaction_date: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            quantity_sold: require("quantitySold", quantity_sold)?,
            product_id: require("productId", product_id)?,
            transaction_date: transaction_date.unwrap_or_else(Utc::now),
        })
    }
}

/// Partial update for a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub quantity_sold: Option<i32>,
    pub product_id: Option<i32>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Filters for listing transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub product_id: Option<i32>,
    pub range: Option<DateRange>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        self.product_id.map_or(true, |id| t.product_id == id)
            && self.range.map_or(true, |r| r.contains(t.transaction_date))
    }
}
