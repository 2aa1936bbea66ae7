//! Error type for `plaint-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An integer does not fit on the other side of the column (negative
  /// stored counter, counter above `i64::MAX`).
  #[error("column {column} out of range: {value}")]
  OutOfRange { column: &'static str, value: i128 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
