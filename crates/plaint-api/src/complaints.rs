//! Handlers for `/api/v1/complaints` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/v1/complaints` | Body: [`SubmitBody`]; creates or increments |
//! | `GET`  | `/api/v1/complaints` | Every complaint |
//! | `GET`  | `/api/v1/complaints/{id}` | 404 if not found |
//! | `PUT`  | `/api/v1/complaints/{id}` | Body: [`ContentBody`]; replaces content only |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use plaint_core::{
  complaint::{Complaint, ComplaintId},
  geo::Locator,
  ledger::Ledger,
  store::ComplaintStore,
};
use serde::Deserialize;

use crate::{client_ip::ClientIp, error::ApiError};

type LedgerState<S, L> = State<Arc<Ledger<S, L>>>;

// ─── Validation ───────────────────────────────────────────────────────────────

/// Collects `"<field>: must not be blank"` violations in field order.
#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
  fn not_blank(&mut self, field: &str, value: Option<String>) -> String {
    match value {
      Some(v) if !v.trim().is_empty() => v,
      _ => {
        self.0.push(format!("{field}: must not be blank"));
        String::new()
      }
    }
  }

  fn finish(self) -> Result<(), ApiError> {
    if self.0.is_empty() { Ok(()) } else { Err(ApiError::BadRequest(self.0.join(", "))) }
  }
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/v1/complaints`.
///
/// Fields are optional here so that a missing field is reported the same way
/// as a blank one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
  pub product_id: Option<String>,
  pub content:    Option<String>,
  pub reporter:   Option<String>,
}

/// `POST /api/v1/complaints`: 200 + the created or incremented complaint.
pub async fn create<S, L>(
  State(ledger): LedgerState<S, L>,
  ClientIp(ip): ClientIp,
  body: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore + 'static,
  L: Locator + 'static,
{
  let Json(body) = body?;

  let mut v = Violations::default();
  let product_id = v.not_blank("productId", body.product_id);
  let content = v.not_blank("content", body.content);
  let reporter = v.not_blank("reporter", body.reporter);
  v.finish()?;

  let saved = ledger.submit(&product_id, &content, &reporter, &ip).await?;
  tracing::info!(id = %saved.id, counter = saved.counter, "complaint saved");
  Ok(Json(saved))
}

// ─── Update content ───────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /api/v1/complaints/{id}`.
#[derive(Debug, Deserialize)]
pub struct ContentBody {
  pub content: Option<String>,
}

/// `PUT /api/v1/complaints/{id}`
pub async fn update<S, L>(
  State(ledger): LedgerState<S, L>,
  id: Result<Path<ComplaintId>, PathRejection>,
  body: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore + 'static,
  L: Locator + 'static,
{
  let Path(id) = id?;
  let Json(body) = body?;

  let mut v = Violations::default();
  let content = v.not_blank("content", body.content);
  v.finish()?;

  Ok(Json(ledger.update_content(id, &content).await?))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /api/v1/complaints`
pub async fn list<S, L>(State(ledger): LedgerState<S, L>) -> Result<Json<Vec<Complaint>>, ApiError>
where
  S: ComplaintStore + 'static,
  L: Locator + 'static,
{
  Ok(Json(ledger.find_all().await?))
}

/// `GET /api/v1/complaints/{id}`
pub async fn get_one<S, L>(
  State(ledger): LedgerState<S, L>,
  id: Result<Path<ComplaintId>, PathRejection>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore + 'static,
  L: Locator + 'static,
{
  let Path(id) = id?;
  Ok(Json(ledger.find_by_id(id).await?))
}
