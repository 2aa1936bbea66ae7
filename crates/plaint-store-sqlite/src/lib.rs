//! SQLite backend for the Plaint complaint ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The `(product_id, reporter)` UNIQUE
//! constraint lives in the schema; conflicting inserts surface as
//! [`InsertOutcome::Conflict`](plaint_core::store::InsertOutcome::Conflict).

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
