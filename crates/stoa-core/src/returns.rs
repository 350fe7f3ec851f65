//! Return requests and the per-order history aggregation.
//!
//! An order may accumulate any number of return requests over its
//! lifetime. The aggregator collapses them into a single most-recent
//! view plus one approval flag spanning the whole set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  order::{OrderId, lenient_datetime, lenient_id},
  status::{CanonicalStatus, normalize_return_status},
};

// ─── Return request ──────────────────────────────────────────────────────────

/// A customer-initiated record tracking one return/refund claim
/// against one order. Immutable snapshot, like [`crate::order::Order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
  #[serde(default, deserialize_with = "lenient_id")]
  pub id: Option<String>,
  pub order_id: OrderId,

  /// Free text from the upstream, e.g. `REQUESTED`, `APPROVED`,
  /// `REJECTED`, `PROCESSED`.
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub reason: Option<String>,
  #[serde(default)]
  pub notes: Option<String>,

  #[serde(default, deserialize_with = "lenient_datetime")]
  pub created_at: Option<DateTime<Utc>>,
}

impl ReturnRequest {
  /// The request status mapped onto the canonical lifecycle via the
  /// return-history normalizer variant.
  #[must_use]
  pub fn canonical_status(&self) -> CanonicalStatus {
    normalize_return_status(&self.status)
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Statuses that count as an approval anywhere in an order's history.
const APPROVAL_MARKERS: [&str; 4] = ["approved", "accept", "processed", "success"];

/// The collapsed return history for one order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReturnHistory {
  /// The most recent request, or `None` when the order has no history.
  pub latest: Option<ReturnRequest>,
  /// True iff any request in the full set was ever approved — not just
  /// the latest one.
  pub approved: bool,
}

impl ReturnHistory {
  /// Canonical lifecycle state of the latest request, mapped through
  /// the return-variant normalizer. `None` when the order has no
  /// history at all.
  #[must_use]
  pub fn latest_canonical_status(&self) -> Option<CanonicalStatus> {
    self.latest.as_ref().map(ReturnRequest::canonical_status)
  }
}

/// Collapse the return requests recorded against one order.
///
/// The upstream claims to return requests most-recent-first, but that
/// ordering contract is not trusted here: requests are re-sorted by
/// creation time descending before the head is taken as `latest`.
/// Requests without a usable timestamp sink to the end; the sort is
/// stable, so they keep their source order among themselves.
#[must_use]
pub fn aggregate_history(mut requests: Vec<ReturnRequest>) -> ReturnHistory {
  let approved = requests.iter().any(|request| {
    let status = request.status.to_lowercase();
    APPROVAL_MARKERS.iter().any(|marker| status.contains(marker))
  });

  requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

  ReturnHistory {
    latest: requests.into_iter().next(),
    approved,
  }
}
