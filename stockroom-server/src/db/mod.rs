//! Database layer - store contract, backends, pool and schema bootstrap
//!
//! # Design Principles
//!
//! - Handlers talk to `dyn Store`; Postgres and in-memory backends share one contract
//! - All list operations use JOINs - no N+1 queries
//! - Rely on DB constraints for foreign keys - no check-then-insert in Postgres
//! - Missing ids are explicit: `None` on update, `DeleteOutcome::Absent` on delete

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::connect;
pub use postgres::PgStore;
pub use store::{DbError, DeleteOutcome, Store};
