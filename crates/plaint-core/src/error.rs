//! Error types for `plaint-core`.

use thiserror::Error;

use crate::complaint::ComplaintId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Complaint not found with id: {0}")]
  NotFound(ComplaintId),

  /// The store reported the natural key as taken, but no row carries it.
  /// Only reachable if rows are removed behind the ledger's back.
  #[error("complaint {product_id}/{reporter} vanished after an insert conflict")]
  KeyVanished { product_id: String, reporter: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
