//! JSON REST API for Plaint.
//!
//! Exposes an axum [`Router`] backed by a [`Ledger`] over any
//! [`ComplaintStore`] and [`Locator`]. Validation and status-code mapping live
//! here; TLS and transport concerns are the caller's responsibility.
//!
//! For the client address to fall back to the TCP peer, serve the router
//! with `into_make_service_with_connect_info::<SocketAddr>()`.

pub mod client_ip;
pub mod complaints;
pub mod error;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use plaint_core::{geo::Locator, ledger::Ledger, store::ComplaintStore};

pub use error::ApiError;

/// Build the complaint API router for `ledger`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S, L>(ledger: Arc<Ledger<S, L>>) -> Router<()>
where
  S: ComplaintStore + 'static,
  L: Locator + 'static,
{
  Router::new()
    .route(
      "/api/v1/complaints",
      get(complaints::list::<S, L>).post(complaints::create::<S, L>),
    )
    .route(
      "/api/v1/complaints/{id}",
      get(complaints::get_one::<S, L>).put(complaints::update::<S, L>),
    )
    .layer(middleware::from_fn(error::attach_path))
    .with_state(ledger)
}

// ─── Integration tests ────────────────────────────────────────────────────────
