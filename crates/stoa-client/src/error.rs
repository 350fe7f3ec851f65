//! Error types for `stoa-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Identity(#[from] stoa_core::Error),

  /// Transport-level failure, including the per-call timeout.
  #[error("http request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("GET {url} returned {status}")]
  Status {
    status: reqwest::StatusCode,
    url:    String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
