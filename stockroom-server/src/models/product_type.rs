//! Product type records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{non_blank, require};
use super::ValidationError;

/// Product type record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: i32,
    /// Label such as `Electronics`, `Clothing` or `Books` (not enforced)
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Id + label projection used by the sales summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductTypeRef {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&ProductType> for ProductTypeRef {
    fn from(t: &ProductType) -> Self {
        Self {
            id: t.id,
            kind: t.kind.clone(),
        }
    }
}

/// Validated input for creating a product type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductType {
    pub kind: String,
}

impl NewProductType {
    pub fn new(kind: Option<String>) -> Result<Self, ValidationError> {
        let kind = require("type", kind)?;
        Ok(Self {
            kind: non_blank("type", &kind)?,
        })
    }
}

/// Partial update for a product type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductTypePatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ProductTypePatch {
    /// Reject blank labels; trims the ones that are kept.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let kind = self.kind.map(|k| non_blank("type", &k)).transpose()?;
        Ok(Self { kind })
    }
}
