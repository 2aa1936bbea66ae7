//! The `ComplaintStore` trait and its insert outcome.
//!
//! The trait is implemented by storage backends (e.g. `plaint-store-sqlite`).
//! The [`Ledger`](crate::ledger::Ledger) depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::complaint::{Complaint, ComplaintId, NewComplaint};

// ─── Insert outcome ──────────────────────────────────────────────────────────

/// Result of [`ComplaintStore::insert`].
#[derive(Debug, Clone)]
pub enum InsertOutcome {
  Inserted(Complaint),
  /// A row with the same `(product_id, reporter)` already exists. Nothing was
  /// written.
  Conflict,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a complaint store backend.
///
/// Every method is a single atomic statement. The store must enforce
/// uniqueness of `(product_id, reporter)`; that constraint is what keeps two
/// racing submissions from both creating a row. Writes change the stored row
/// in place (`counter + 1`, `content = ?`), so they cannot lose an update
/// made concurrently by another caller.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ComplaintStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look a complaint up by its natural key.
  fn find_by_natural_key<'a>(
    &'a self,
    product_id: &'a str,
    reporter: &'a str,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + 'a;

  /// Retrieve a complaint by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: ComplaintId,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + '_;

  /// Insert a new complaint with `counter = 1`.
  ///
  /// A uniqueness violation on the natural key is reported as
  /// [`InsertOutcome::Conflict`], not as an error.
  fn insert(
    &self,
    input: NewComplaint,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Add one to the counter of the complaint with this natural key and return
  /// the row as stored. `None` if no such complaint exists.
  fn increment<'a>(
    &'a self,
    product_id: &'a str,
    reporter: &'a str,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + 'a;

  /// Overwrite the content of complaint `id`, leaving every other field as
  /// stored. `None` if no such complaint exists.
  fn set_content<'a>(
    &'a self,
    id: ComplaintId,
    content: &'a str,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + 'a;

  /// Snapshot of every complaint, in insertion order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Complaint>, Self::Error>> + Send + '_;
}
