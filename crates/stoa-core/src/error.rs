//! Error types for `stoa-core`.
//!
//! The reconciliation functions themselves are total — normalization,
//! classification, and view assembly never fail. The only fallible
//! edge this crate owns is identity validation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("customer identity must include an email or a phone number")]
  MissingIdentity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
