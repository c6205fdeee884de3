//! Sold-transactions summary
//!
//! Groups transactions by product, sums `quantitySold`, counts rows and
//! orders the groups by total sold (descending, ties by product id).
//! The Postgres store runs the same rules as one grouped query; this module
//! is the in-process version used by the in-memory store.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{DateRange, ProductTypeRef, Transaction};

/// Product as it appears inside a summary row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldProduct {
    pub id: i32,
    pub name: String,
    pub stock: i32,
    pub product_type_id: Option<i32>,
    #[serde(rename = "ProductType")]
    pub product_type: Option<ProductTypeRef>,
}

/// One product's aggregated sales
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldSummary {
    pub product_id: i32,
    pub total_quantity_sold: i64,
    pub total_quantity_transaction: i64,
    #[serde(rename = "Product")]
    pub product: SoldProduct,
}

#[derive(Default)]
struct Totals {
    sold: i64,
    count: i64,
}

/// Aggregate `transactions` per product.
///
/// `lookup` resolves a product id to its joined projection; transactions
/// whose product cannot be resolved are dropped, like an inner join.
pub fn summarize<'a, I, F>(transactions: I, range: Option<DateRange>, lookup: F) -> Vec<SoldSummary>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(i32) -> Option<SoldProduct>,
{
    let mut groups: BTreeMap<i32, Totals> = BTreeMap::new();

    for t in transactions {
        if range.is_some_and(|r| !r.contains(t.transaction_date)) {
            continue;
        }
        let totals = groups.entry(t.product_id).or_default();
        totals.sold += i64::from(t.quantity_sold);
        totals.count += 1;
    }

    let mut rows: Vec<SoldSummary> = groups
        .into_iter()
        .filter_map(|(product_id, totals)| {
            lookup(product_id).map(|product| SoldSummary {
                product_id,
                total_quantity_sold: totals.sold,
                total_quantity_transaction: totals.count,
                product,
            })
        })
        .collect();

    rank(&mut rows);
    rows
}

/// Order rows by total sold, highest first; equal totals by product id.
pub fn rank(rows: &mut [SoldSummary]) {
    rows.sort_by(|a, b| {
        b.total_quantity_sold
            .cmp(&a.total_quantity_sold)
            .then(a.product_id.cmp(&b.product_id))
    });
}
