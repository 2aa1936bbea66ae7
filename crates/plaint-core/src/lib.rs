//! Core types and trait definitions for the Plaint complaint ledger.
//!
//! This crate has no HTTP or database dependencies. Storage
//! backends implement [`store::ComplaintStore`]; geolocation backends implement
//! [`geo::GeoProvider`]. The [`ledger::Ledger`] ties the two together.

pub mod complaint;
pub mod error;
pub mod geo;
pub mod ledger;
pub mod store;

pub use error::{Error, Result};
