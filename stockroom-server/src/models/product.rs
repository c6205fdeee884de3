//! Product records
//!
//! `productTypeId` is nullable, so the patch type distinguishes an absent
//! field (leave alone) from an explicit `null` (clear the type).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use super::product_type::ProductType;
use super::validation::{non_blank, require};
use super::ValidationError;

/// Product record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub stock: i32,
    pub product_type_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product joined with its type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithType {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "ProductType")]
    pub product_type: Option<ProductType>,
}

/// Validated input for creating a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub stock: i32,
    pub product_type_id: Option<i32>,
}

impl NewProduct {
    pub fn new(
        name: Option<String>,
        stock: Option<i32>,
        product_type_id: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let name = require("name", name)?;
        Ok(Self {
            name: non_blank("name", &name)?,
            stock: require("stock", stock)?,
            product_type_id,
        })
    }
}

/// Partial update for a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub stock: Option<i32>,
    /// `None` leaves the type alone, `Some(None)` clears it
    #[serde(default, deserialize_with = "nullable")]
    pub product_type_id: Option<Option<i32>>,
}

impl ProductPatch {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.map(|n| non_blank("name", &n)).transpose()?;
        Ok(Self { name, ..self })
    }
}

/// Present-but-null becomes `Some(None)`; an absent field stays `None` via `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
