//! [`SqliteStore`]: the SQLite implementation of [`ComplaintStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use plaint_core::{
  complaint::{Complaint, ComplaintId, NewComplaint},
  store::{ComplaintStore, InsertOutcome},
};

use crate::{
  Result,
  encode::{COLUMNS, RawComplaint, encode_dt, encode_unsigned},
  schema::SCHEMA,
};

/// True only for a UNIQUE violation, the one constraint failure that means
/// "a row with this natural key already exists". CHECK and NOT NULL failures
/// are real errors.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A complaint store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored complaints.
  pub async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM complaints", [], |r| r.get(0))?))
      .await?;
    Ok(n.max(0) as usize)
  }

  /// Run `sql` and decode at most one returned row. Serves plain SELECTs and
  /// `UPDATE … RETURNING` alike.
  async fn query_one(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Option<Complaint>> {
    let raw: Option<RawComplaint> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawComplaint::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComplaint::into_complaint).transpose()
  }
}

// ─── ComplaintStore impl ─────────────────────────────────────────────────────

impl ComplaintStore for SqliteStore {
  type Error = crate::Error;

  async fn find_by_natural_key(
    &self,
    product_id: &str,
    reporter: &str,
  ) -> Result<Option<Complaint>> {
    self
      .query_one(
        format!("SELECT {COLUMNS} FROM complaints WHERE product_id = ?1 AND reporter = ?2"),
        vec![product_id.to_owned().into(), reporter.to_owned().into()],
      )
      .await
  }

  async fn find_by_id(&self, id: ComplaintId) -> Result<Option<Complaint>> {
    self
      .query_one(
        format!("SELECT {COLUMNS} FROM complaints WHERE id = ?1"),
        vec![id.0.into()],
      )
      .await
  }

  async fn insert(&self, input: NewComplaint) -> Result<InsertOutcome> {
    let product_id = input.product_id.clone();
    let reporter   = input.reporter.clone();
    let content    = input.content.clone();
    let created_at = encode_dt(input.created_at);
    let country    = input.country.clone();
    let counter    = encode_unsigned("counter", NewComplaint::INITIAL_COUNTER)?;

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO complaints (
             product_id, reporter, content, created_at, country, counter
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![product_id, reporter, content, created_at, country, counter],
        );
        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(match id {
      Some(id) => InsertOutcome::Inserted(input.into_complaint(ComplaintId(id))),
      None => {
        tracing::debug!(
          product_id = %input.product_id,
          reporter = %input.reporter,
          "insert rejected by natural-key constraint"
        );
        InsertOutcome::Conflict
      }
    })
  }

  async fn increment(&self, product_id: &str, reporter: &str) -> Result<Option<Complaint>> {
    self
      .query_one(
        format!(
          "UPDATE complaints SET counter = counter + 1
            WHERE product_id = ?1 AND reporter = ?2
           RETURNING {COLUMNS}"
        ),
        vec![product_id.to_owned().into(), reporter.to_owned().into()],
      )
      .await
  }

  async fn set_content(&self, id: ComplaintId, content: &str) -> Result<Option<Complaint>> {
    self
      .query_one(
        format!("UPDATE complaints SET content = ?1 WHERE id = ?2 RETURNING {COLUMNS}"),
        vec![content.to_owned().into(), id.0.into()],
      )
      .await
  }

  async fn list_all(&self) -> Result<Vec<Complaint>> {
    let raws: Vec<RawComplaint> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM complaints ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawComplaint::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComplaint::into_complaint).collect()
  }
}
