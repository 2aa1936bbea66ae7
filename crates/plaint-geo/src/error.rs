//! Error type for `plaint-geo`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid provider base url: {0:?}")]
  BaseUrl(String),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("provider answered {0}")]
  Status(reqwest::StatusCode),

  #[error("malformed provider response: {0}")]
  Decode(#[source] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
