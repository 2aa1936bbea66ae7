//! API error type, its JSON body, and the [`attach_path`] middleware that
//! stamps the request path onto error bodies.
//!
//! Every error response looks like:
//!
//! ```json
//! {"timestamp":"…","status":404,"error":"Not Found",
//!  "message":"Complaint not found with id: 999","path":"/api/v1/complaints/999"}
//! ```

use axum::{
  Json,
  extract::{
    Request,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  middleware::Next,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<plaint_core::Error> for ApiError {
  fn from(e: plaint_core::Error) -> Self {
    match e {
      plaint_core::Error::NotFound(_) => ApiError::NotFound(e.to_string()),
      plaint_core::Error::Store(_) | plaint_core::Error::KeyVanished { .. } => {
        tracing::error!(error = %e, "store failure");
        ApiError::Internal(e.to_string())
      }
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

// ─── Body ─────────────────────────────────────────────────────────────────────

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
  pub timestamp: DateTime<Utc>,
  pub status:    u16,
  pub error:     &'static str,
  pub message:   String,
  /// Filled in by [`attach_path`].
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path:      Option<String>,
}

impl ErrorBody {
  fn new(status: StatusCode, message: String) -> Self {
    Self {
      timestamp: Utc::now(),
      status: status.as_u16(),
      error: status.canonical_reason().unwrap_or("Error"),
      message,
      path: None,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
    };
    let body = ErrorBody::new(status, message);
    let mut res = (status, Json(body.clone())).into_response();
    // Picked up again by `attach_path`, which knows the request URI.
    res.extensions_mut().insert(body);
    res
  }
}

/// Middleware: re-render [`ApiError`] responses with the request path.
pub async fn attach_path(req: Request, next: Next) -> Response {
  let path = req.uri().path().to_owned();
  let mut res = next.run(req).await;
  match res.extensions_mut().remove::<ErrorBody>() {
    Some(body) => {
      let status = res.status();
      (status, Json(ErrorBody { path: Some(path), ..body })).into_response()
    }
    None => res,
  }
}
