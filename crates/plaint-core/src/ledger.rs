//! [`Ledger`]: find-or-create-with-increment over a [`ComplaintStore`].
//!
//! `submit` never reads a row and writes it back. It asks the store to bump
//! the counter in place, and only inserts when there was nothing to bump.
//! The store's UNIQUE constraint on `(product_id, reporter)` settles racing
//! inserts: the loser gets [`InsertOutcome::Conflict`] and bumps the winner's
//! row instead. No step can lose a concurrent increment, so there is nothing
//! to retry.

use chrono::Utc;

use crate::{
  Error, Result,
  complaint::{Complaint, ComplaintId, NewComplaint},
  geo::Locator,
  store::{ComplaintStore, InsertOutcome},
};

/// The complaint ledger: dedup/increment on submit, plus content edits and
/// lookups.
///
/// Holds no mutable state of its own; share it behind an `Arc`.
pub struct Ledger<S, L> {
  store:   S,
  locator: L,
}

impl<S, L> Ledger<S, L>
where
  S: ComplaintStore,
  L: Locator,
{
  pub fn new(store: S, locator: L) -> Self { Self { store, locator } }

  pub fn store(&self) -> &S { &self.store }

  pub fn locator(&self) -> &L { &self.locator }

  /// Record a submission for `(product_id, reporter)`.
  ///
  /// The first submission creates the complaint with `counter = 1` and a
  /// country resolved from `client_ip`. Every later one bumps `counter` and
  /// leaves `content` and `country` untouched.
  pub async fn submit(
    &self,
    product_id: &str,
    content: &str,
    reporter: &str,
    client_ip: &str,
  ) -> Result<Complaint> {
    if let Some(bumped) = self.increment(product_id, reporter).await? {
      return Ok(bumped);
    }

    let input = NewComplaint {
      product_id: product_id.to_owned(),
      content:    content.to_owned(),
      created_at: Utc::now(),
      reporter:   reporter.to_owned(),
      country:    self.locator.locate(client_ip).await,
    };

    match self.store.insert(input).await.map_err(Error::store)? {
      InsertOutcome::Inserted(created) => {
        tracing::info!(
          id = %created.id,
          country = %created.country,
          "new complaint recorded"
        );
        Ok(created)
      }
      InsertOutcome::Conflict => {
        tracing::debug!(
          product_id,
          reporter,
          "natural key taken by a concurrent submission, folding into it"
        );
        self
          .increment(product_id, reporter)
          .await?
          .ok_or_else(|| Error::KeyVanished {
            product_id: product_id.to_owned(),
            reporter:   reporter.to_owned(),
          })
      }
    }
  }

  async fn increment(&self, product_id: &str, reporter: &str) -> Result<Option<Complaint>> {
    let bumped = self
      .store
      .increment(product_id, reporter)
      .await
      .map_err(Error::store)?;
    if let Some(c) = &bumped {
      tracing::info!(
        id = %c.id,
        counter = c.counter,
        "repeat complaint folded into existing record"
      );
    }
    Ok(bumped)
  }

  /// Overwrite the content of complaint `id`. Nothing else changes.
  pub async fn update_content(&self, id: ComplaintId, new_content: &str) -> Result<Complaint> {
    let updated = self
      .store
      .set_content(id, new_content)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))?;
    tracing::info!(%id, "complaint content updated");
    Ok(updated)
  }

  /// Point-in-time snapshot of every complaint.
  pub async fn find_all(&self) -> Result<Vec<Complaint>> {
    self.store.list_all().await.map_err(Error::store)
  }

  pub async fn find_by_id(&self, id: ComplaintId) -> Result<Complaint> {
    self
      .store
      .find_by_id(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))
  }
}
