//! Per-order return-eligibility records.
//!
//! Eligibility is decided by an external policy capability, one lookup
//! per order. The engine substitutes [`EligibilityRecord::unavailable`]
//! when a lookup fails, so a single flaky check never disturbs its
//! siblings.

use serde::{Deserialize, Serialize};

/// Shown in place of a reason when the external check could not be
/// reached in this pass.
pub const ELIGIBILITY_UNAVAILABLE: &str = "Unable to check eligibility right now";

/// The outcome of one external eligibility check. At most one record
/// per order per reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRecord {
  pub eligible: bool,
  /// Human-readable reason when the order is not eligible.
  #[serde(default)]
  pub reason: Option<String>,
}

impl EligibilityRecord {
  /// A positive policy decision.
  #[must_use]
  pub fn allowed() -> Self {
    Self { eligible: true, reason: None }
  }

  /// A negative policy decision with an upstream-provided reason.
  #[must_use]
  pub fn denied(reason: Option<String>) -> Self {
    Self { eligible: false, reason }
  }

  /// The safe default recorded when a lookup fails or times out.
  /// Terminal for the order within the current pass; the caller may
  /// re-run the whole resolution cycle later.
  #[must_use]
  pub fn unavailable() -> Self {
    Self {
      eligible: false,
      reason: Some(ELIGIBILITY_UNAVAILABLE.to_string()),
    }
  }
}
