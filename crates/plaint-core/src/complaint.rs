//! Complaint, the single entity tracked by the ledger.
//!
//! A complaint is identified twice: by its store-assigned [`ComplaintId`] and
//! by its natural key, the `(product_id, reporter)` pair. Repeat submissions
//! for the same natural key fold into one record by bumping `counter`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier. Immutable once the row exists.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ComplaintId(pub i64);

impl fmt::Display for ComplaintId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A persisted complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
  pub id:         ComplaintId,
  pub product_id: String,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub reporter:   String,
  /// Resolved once at creation; `"UNKNOWN"` when the lookup failed.
  pub country:    String,
  /// Number of submissions folded into this record. Always `>= 1`.
  pub counter:    u64,
}

impl Complaint {
  /// True if this record belongs to the given natural key.
  pub fn has_key(&self, product_id: &str, reporter: &str) -> bool {
    self.product_id == product_id && self.reporter == reporter
  }
}

/// Everything needed to insert a fresh complaint; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewComplaint {
  pub product_id: String,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub reporter:   String,
  pub country:    String,
}

impl NewComplaint {
  /// Counter value of every freshly inserted complaint.
  pub const INITIAL_COUNTER: u64 = 1;

  /// Bind this input to a store-assigned id.
  pub fn into_complaint(self, id: ComplaintId) -> Complaint {
    Complaint {
      id,
      product_id: self.product_id,
      content: self.content,
      created_at: self.created_at,
      reporter: self.reporter,
      country: self.country,
      counter: Self::INITIAL_COUNTER,
    }
  }
}
