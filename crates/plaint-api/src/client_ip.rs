//! [`ClientIp`] extractor: the address geolocation should look up.

use std::{
  convert::Infallible,
  net::{IpAddr, SocketAddr},
};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, request::Parts},
};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// The submitting client's address as a string; empty when unknown.
///
/// Prefers the first entry of `X-Forwarded-For`, then the peer address (only
/// present when the server is run with
/// `into_make_service_with_connect_info::<SocketAddr>()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let peer = parts
      .extensions
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| addr.ip());
    Ok(Self(client_ip(&parts.headers, peer)))
  }
}

pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
  headers
    .get(X_FORWARDED_FOR)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(',').next())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .or_else(|| peer.map(|ip| ip.to_string()))
    .unwrap_or_default()
}
