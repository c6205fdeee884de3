//! In-memory `Store` for tests and `serve --in-memory`
//!
//! Emulates the Postgres schema: serial ids per table, `ON DELETE SET NULL`
//! from products to types, `ON DELETE RESTRICT` from transactions to
//! products, and FK checks on insert/update (reported as `Conflict`).

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::store::{DbError, DeleteOutcome, Store};
use crate::models::{
    DateRange, NewProduct, NewProductType, NewTransaction, Product, ProductPatch,
    ProductType, ProductTypePatch, ProductTypeRef, ProductWithType, Transaction,
    TransactionFilter, TransactionPatch, TransactionWithProduct,
};
use crate::sales::{self, SoldProduct, SoldSummary};

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    product_types: BTreeMap<i32, ProductType>,
    products: BTreeMap<i32, Product>,
    transactions: BTreeMap<i32, Transaction>,
    type_seq: i32,
    product_seq: i32,
    transaction_seq: i32,
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

impl Tables {
    fn join_product(&self, product: &Product) -> ProductWithType {
        ProductWithType {
            product: product.clone(),
            product_type: product
                .product_type_id
                .and_then(|id| self.product_types.get(&id))
                .cloned(),
        }
    }

    fn join_transaction(&self, t: &Transaction) -> Option<TransactionWithProduct> {
        self.products.get(&t.product_id).map(|p| TransactionWithProduct {
            transaction: t.clone(),
            product: self.join_product(p),
        })
    }

    fn sold_product(&self, id: i32) -> Option<SoldProduct> {
        self.products.get(&id).map(|p| SoldProduct {
            id: p.id,
            name: p.name.clone(),
            stock: p.stock,
            product_type_id: p.product_type_id,
            product_type: p
                .product_type_id
                .and_then(|tid| self.product_types.get(&tid))
                .map(ProductTypeRef::from),
        })
    }

    fn check_type_ref(&self, product_type_id: Option<i32>) -> Result<(), DbError> {
        match product_type_id {
            Some(id) if !self.product_types.contains_key(&id) => Err(DbError::Conflict {
                resource: "product",
                reason: format!("productTypeId {} does not reference a product type", id),
            }),
            _ => Ok(()),
        }
    }

    fn check_product_ref(&self, product_id: i32) -> Result<(), DbError> {
        if self.products.contains_key(&product_id) {
            Ok(())
        } else {
            Err(DbError::Conflict {
                resource: "transaction",
                reason: format!("productId {} does not reference a product", product_id),
            })
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_product_type(&self, new: NewProductType) -> Result<ProductType, DbError> {
        let mut tables = self.write();
        let now = Utc::now();
        let created = ProductType {
            id: next_id(&mut tables.type_seq),
            kind: new.kind,
            created_at: now,
            updated_at: now,
        };
        tables.product_types.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_product_types(&self) -> Result<Vec<ProductType>, DbError> {
        Ok(self.read().product_types.values().cloned().collect())
    }

    async fn update_product_type(
        &self,
        id: i32,
        patch: ProductTypePatch,
    ) -> Result<Option<ProductType>, DbError> {
        let mut tables = self.write();
        let Some(row) = tables.product_types.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(kind) = patch.kind {
            row.kind = kind;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_product_type(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        let mut tables = self.write();
        if tables.product_types.remove(&id).is_none() {
            return Ok(DeleteOutcome::Absent);
        }

        for product in tables.products.values_mut() {
            if product.product_type_id == Some(id) {
                product.product_type_id = None;
            }
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, DbError> {
        let mut tables = self.write();
        tables.check_type_ref(new.product_type_id)?;

        let now = Utc::now();
        let created = Product {
            id: next_id(&mut tables.product_seq),
            name: new.name,
            stock: new.stock,
            product_type_id: new.product_type_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_products(&self) -> Result<Vec<ProductWithType>, DbError> {
        let tables = self.read();
        Ok(tables
            .products
            .values()
            .map(|p| tables.join_product(p))
            .collect())
    }

    async fn update_product(
        &self,
        id: i32,
        patch: ProductPatch,
    ) -> Result<Option<ProductWithType>, DbError> {
        let mut tables = self.write();
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        if let Some(type_id) = patch.product_type_id {
            tables.check_type_ref(type_id)?;
        }

        let updated = {
            let Some(row) = tables.products.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name {
                row.name = name;
            }
            if let Some(stock) = patch.stock {
                row.stock = stock;
            }
            if let Some(type_id) = patch.product_type_id {
                row.product_type_id = type_id;
            }
            row.updated_at = Utc::now();
            row.clone()
        };

        Ok(Some(tables.join_product(&updated)))
    }

    async fn delete_product(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        let mut tables = self.write();
        if tables.transactions.values().any(|t| t.product_id == id) {
            return Err(DbError::Conflict {
                resource: "product",
                reason: format!("product {} still has recorded transactions", id),
            });
        }
        Ok(if tables.products.remove(&id).is_some() {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Absent
        })
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, DbError> {
        let mut tables = self.write();
        tables.check_product_ref(new.product_id)?;

        let now = Utc::now();
        let created = Transaction {
            id: next_id(&mut tables.transaction_seq),
            quantity_sold: new.quantity_sold,
            product_id: new.product_id,
            transaction_date: new.transaction_date,
            created_at: now,
            updated_at: now,
        };
        tables.transactions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionWithProduct>, DbError> {
        let tables = self.read();
        Ok(tables
            .transactions
            .values()
            .filter(|t| filter.matches(t))
            .filter_map(|t| tables.join_transaction(t))
            .collect())
    }

    async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> Result<Option<TransactionWithProduct>, DbError> {
        let mut tables = self.write();
        if !tables.transactions.contains_key(&id) {
            return Ok(None);
        }
        if let Some(product_id) = patch.product_id {
            tables.check_product_ref(product_id)?;
        }

        let updated = {
            let Some(row) = tables.transactions.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(qty) = patch.quantity_sold {
                row.quantity_sold = qty;
            }
            if let Some(product_id) = patch.product_id {
                row.product_id = product_id;
            }
            if let Some(at) = patch.transaction_date {
                row.transaction_date = at;
            }
            row.updated_at = Utc::now();
            row.clone()
        };

        Ok(tables.join_transaction(&updated))
    }

    async fn delete_transaction(&self, id: i32) -> Result<DeleteOutcome, DbError> {
        let removed = self.write().transactions.remove(&id);
        Ok(if removed.is_some() {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Absent
        })
    }

    async fn sold_summary(&self, range: Option<DateRange>) -> Result<Vec<SoldSummary>, DbError> {
        let tables = self.read();
        Ok(sales::summarize(
            tables.transactions.values(),
            range,
            |id| tables.sold_product(id),
        ))
    }
}
