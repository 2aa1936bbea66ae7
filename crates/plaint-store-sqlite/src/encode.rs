//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; counters as `INTEGER`.

use chrono::{DateTime, Utc};
use plaint_core::complaint::{Complaint, ComplaintId};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn encode_unsigned(column: &'static str, value: u64) -> Result<i64> {
  i64::try_from(value).map_err(|_| Error::OutOfRange { column, value: value.into() })
}

fn decode_unsigned<T: TryFrom<i64>>(column: &'static str, value: i64) -> Result<T> {
  T::try_from(value).map_err(|_| Error::OutOfRange { column, value: value.into() })
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list matching [`RawComplaint::from_row`].
pub const COLUMNS: &str =
  "id, product_id, reporter, content, created_at, country, counter";

/// Raw values read directly from a `complaints` row.
pub struct RawComplaint {
  pub id:         i64,
  pub product_id: String,
  pub reporter:   String,
  pub content:    String,
  pub created_at: String,
  pub country:    String,
  pub counter:    i64,
}

impl RawComplaint {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      product_id: row.get(1)?,
      reporter:   row.get(2)?,
      content:    row.get(3)?,
      created_at: row.get(4)?,
      country:    row.get(5)?,
      counter:    row.get(6)?,
    })
  }

  pub fn into_complaint(self) -> Result<Complaint> {
    Ok(Complaint {
      id:         ComplaintId(self.id),
      product_id: self.product_id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      reporter:   self.reporter,
      country:    self.country,
      counter:    decode_unsigned("counter", self.counter)?,
    })
  }
}
