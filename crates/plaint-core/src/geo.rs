//! Best-effort country lookup for new complaints.
//!
//! [`GeoProvider`] is the raw, fallible network lookup. [`LocationResolver`]
//! wraps one with a timeout and a fallback, and exposes the total
//! [`Locator`] capability the ledger depends on: it always yields a country
//! string, [`UNKNOWN_COUNTRY`] when anything goes wrong.

use std::{future::Future, time::Duration};

use serde::Deserialize;

/// Sentinel country recorded when the lookup fails for any reason.
pub const UNKNOWN_COUNTRY: &str = "UNKNOWN";

/// Upper bound on a single provider call unless configured otherwise.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

// ─── Provider ────────────────────────────────────────────────────────────────

/// Raw provider answer: `{"status":"success","country":"France"}` or
/// `{"status":"fail","message":"invalid query"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeoLookup {
  pub status:  String,
  #[serde(default)]
  pub country: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

impl GeoLookup {
  pub const SUCCESS: &'static str = "success";

  /// The country name if the provider reported success with a non-empty
  /// country, otherwise the provider's reason for rejecting the query.
  pub fn into_country(self) -> Result<String, String> {
    match self.country {
      Some(country) if self.status == Self::SUCCESS && !country.trim().is_empty() => {
        Ok(country)
      }
      _ if self.status == Self::SUCCESS => Err("success without a country".to_owned()),
      _ => Err(
        self
          .message
          .unwrap_or_else(|| format!("status {:?}", self.status)),
      ),
    }
  }
}

/// A network service mapping an IP address to a country.
///
/// Implementations may time out, fail, or report a non-success status; none
/// of that is allowed to escape [`LocationResolver`].
pub trait GeoProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn lookup<'a>(
    &'a self,
    ip: &'a str,
  ) -> impl Future<Output = Result<GeoLookup, Self::Error>> + Send + 'a;
}

// ─── Locator ─────────────────────────────────────────────────────────────────

/// Total country lookup: never fails, never blocks past its own timeout.
pub trait Locator: Send + Sync {
  fn locate<'a>(&'a self, ip: &'a str) -> impl Future<Output = String> + Send + 'a;
}

/// [`Locator`] over a [`GeoProvider`], with a single attempt per call bounded
/// by `timeout`.
#[derive(Debug, Clone)]
pub struct LocationResolver<P> {
  provider: P,
  timeout:  Duration,
}

impl<P: GeoProvider> LocationResolver<P> {
  pub fn new(provider: P) -> Self {
    Self { provider, timeout: DEFAULT_LOOKUP_TIMEOUT }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }
}

impl<P: GeoProvider> Locator for LocationResolver<P> {
  async fn locate(&self, ip: &str) -> String {
    let ip = ip.trim();
    if ip.is_empty() {
      tracing::debug!("no client address, skipping geolocation");
      return UNKNOWN_COUNTRY.to_owned();
    }

    // Provider rejections (bad or private address) are permanent for this
    // address; transport failures and timeouts are not.
    match tokio::time::timeout(self.timeout, self.provider.lookup(ip)).await {
      Ok(Ok(lookup)) => match lookup.into_country() {
        Ok(country) => country,
        Err(reason) => {
          tracing::warn!(ip, %reason, "geolocation lookup rejected");
          UNKNOWN_COUNTRY.to_owned()
        }
      },
      Ok(Err(e)) => {
        tracing::error!(ip, error = %e, "geolocation lookup failed");
        UNKNOWN_COUNTRY.to_owned()
      }
      Err(_) => {
        tracing::error!(
          ip,
          timeout_ms = self.timeout.as_millis() as u64,
          "geolocation lookup timed out"
        );
        UNKNOWN_COUNTRY.to_owned()
      }
    }
  }
}
