//! The canonical order lifecycle and the free-text status normalizers.
//!
//! Upstream systems report order state as free text ("Cancelled -
//! customer request", "Shipped to customer", "rto initiated").
//! Everything downstream works on the fixed seven-member lifecycle
//! defined here; the normalizers are total — any text, including
//! nothing at all, maps to a canonical state.

use serde::{Deserialize, Serialize};

// ─── Canonical lifecycle ─────────────────────────────────────────────────────

/// The fixed order lifecycle. Variant order is rank order — the
/// general order listing sorts ascending by [`CanonicalStatus::rank`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
  OrderPlaced,
  Confirmed,
  Shipped,
  OutForDelivery,
  Delivered,
  Rto,
  Cancelled,
}

impl CanonicalStatus {
  /// Fixed sort rank: `Order Placed = 0` through `Cancelled = 6`.
  #[must_use]
  pub const fn rank(self) -> u8 { self as u8 }

  /// The display string shown to customers.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::OrderPlaced => "Order Placed",
      Self::Confirmed => "Confirmed",
      Self::Shipped => "Shipped",
      Self::OutForDelivery => "Out For Delivery",
      Self::Delivered => "Delivered",
      Self::Rto => "RTO",
      Self::Cancelled => "Cancelled",
    }
  }
}

impl std::fmt::Display for CanonicalStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Rule tables ─────────────────────────────────────────────────────────────

/// One rule: if the lowercased input contains any of the patterns, the
/// input normalizes to the paired status. First matching rule wins, so
/// table order is precedence order and must not be rearranged — raw
/// statuses routinely contain several candidate substrings at once.
type Rule = (&'static [&'static str], CanonicalStatus);

const ORDER_RULES: &[Rule] = &[
  (&["cancel"], CanonicalStatus::Cancelled),
  (&["rto"], CanonicalStatus::Rto),
  (&["deliver"], CanonicalStatus::Delivered),
  (&["out for"], CanonicalStatus::OutForDelivery),
  (&["ship", "dispatch", "in transit"], CanonicalStatus::Shipped),
  (&["confirm", "process", "accept"], CanonicalStatus::Confirmed),
];

/// Variant used by the return-history feature. Same canonical set and
/// same fallback as [`ORDER_RULES`], with an explicit passthrough for
/// statuses the upstream already reports in canonical form.
const RETURN_RULES: &[Rule] = &[
  (&["cancel"], CanonicalStatus::Cancelled),
  (&["rto"], CanonicalStatus::Rto),
  (&["deliver"], CanonicalStatus::Delivered),
  (&["out for"], CanonicalStatus::OutForDelivery),
  (&["ship", "dispatch", "in transit"], CanonicalStatus::Shipped),
  (&["order placed"], CanonicalStatus::OrderPlaced),
  (&["confirm", "process", "accept"], CanonicalStatus::Confirmed),
];

fn match_rules(raw: &str, rules: &[Rule]) -> CanonicalStatus {
  let needle = raw.to_lowercase();
  for (patterns, status) in rules {
    if patterns.iter().any(|p| needle.contains(p)) {
      return *status;
    }
  }
  // Anything unrecognised, including empty input, is an order that has
  // only just been placed. Never an error.
  CanonicalStatus::OrderPlaced
}

// ─── Normalizers ─────────────────────────────────────────────────────────────

/// Normalize a raw order status. Total over all inputs.
#[must_use]
pub fn normalize_order_status(raw: &str) -> CanonicalStatus {
  match_rules(raw, ORDER_RULES)
}

/// Normalize a raw status as reported by the return-request history
/// feed. Independent rule set from [`normalize_order_status`]; both
/// agree on the canonical set and on `Order Placed` as the fallback.
#[must_use]
pub fn normalize_return_status(raw: &str) -> CanonicalStatus {
  match_rules(raw, RETURN_RULES)
}
