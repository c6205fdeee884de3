//! stockroom-server: inventory and sales HTTP API
//!
//! CRUD over products, product types and sales transactions, plus a
//! per-product "sorted sold" summary. Handlers talk to a [`db::Store`],
//! backed by PostgreSQL in production and by [`db::MemoryStore`] in tests.

pub mod db;
pub mod http;
pub mod models;
pub mod sales;

pub use db::{DbError, DeleteOutcome, MemoryStore, PgStore, Store};
pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
