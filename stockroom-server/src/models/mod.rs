//! Domain models
//!
//! Records mirror the three tables. Create inputs are validated at
//! construction; patches validate before they reach the store.

pub mod validation;
pub mod date_range;
pub mod product_type;
pub mod product;
pub mod transaction;

pub use validation::ValidationError;
pub use date_range::DateRange;
pub use product_type::{NewProductType, ProductType, ProductTypePatch, ProductTypeRef};
pub use product::{NewProduct, Product, ProductPatch, ProductWithType};
pub use transaction::{
    NewTransaction, Transaction, TransactionFilter, TransactionPatch, TransactionWithProduct,
};
