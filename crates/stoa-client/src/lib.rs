//! HTTP adapter for the upstream storefront order/returns API.
//!
//! Implements [`stoa_core::source::OrderSource`] over three read-only
//! collection endpoints. Response shape matters here, wire bytes do
//! not: payloads are decoded leniently by the `stoa-core` types.

mod client;

pub mod error;

pub use client::{HttpSource, SourceConfig};
pub use error::{Error, Result};
