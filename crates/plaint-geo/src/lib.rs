//! `ip-api.com` implementation of [`GeoProvider`].
//!
//! Issues `GET {base}/json/{ip}?fields=status,message,country` and hands the
//! decoded body back as a [`GeoLookup`]. Every failure is returned as an
//! [`Error`]; turning those into the `"UNKNOWN"` fallback is the job of
//! [`LocationResolver`](plaint_core::geo::LocationResolver).

pub mod error;

use std::time::Duration;

use plaint_core::geo::{GeoLookup, GeoProvider};
use reqwest::{Client, Url};

pub use error::{Error, Result};

/// Public endpoint; plain HTTP is all the free tier offers.
pub const DEFAULT_BASE_URL: &str = "http://ip-api.com";

const FIELDS: &str = "status,message,country";

/// Async HTTP client for the `ip-api.com` JSON endpoint.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based, so one
/// instance is shared across all requests.
#[derive(Debug, Clone)]
pub struct IpApiClient {
  client: Client,
  base:   Url,
}

impl IpApiClient {
  /// Build a client against `base_url`, with `timeout` applied to every
  /// request.
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let base = Url::parse(base_url)
      .ok()
      .filter(|u| !u.cannot_be_a_base())
      .ok_or_else(|| Error::BaseUrl(base_url.to_owned()))?;
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, base })
  }

  fn url(&self, ip: &str) -> Url {
    let mut url = self.base.clone();
    // Pushing as a segment percent-encodes whatever the caller forwarded.
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push("json").push(ip);
    }
    url
  }
}

impl GeoProvider for IpApiClient {
  type Error = Error;

  async fn lookup(&self, ip: &str) -> Result<GeoLookup> {
    let resp = self
      .client
      .get(self.url(ip))
      .query(&[("fields", FIELDS)])
      .send()
      .await
      .map_err(Error::Transport)?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }

    let lookup: GeoLookup = resp.json().await.map_err(Error::Decode)?;
    tracing::debug!(ip, status = %lookup.status, "geolocation provider answered");
    Ok(lookup)
  }
}
