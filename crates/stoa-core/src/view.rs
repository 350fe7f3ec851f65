//! The assembled order view — the read model handed to presentation.
//!
//! Assembly is pure derivation over an order snapshot plus its
//! classification, eligibility, and return-history annotations. Every
//! accessor degrades to an empty or zero default; assembly can never
//! fail on missing or malformed nested fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  eligibility::EligibilityRecord,
  order::{Order, OrderId},
  returns::ReturnHistory,
  status::CanonicalStatus,
};

/// Display name used when an order carries no line items at all.
const NAMELESS_ORDER: &str = "Order";

/// One row of the rendered order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
  pub id: OrderId,

  /// First line item's name, suffixed with `+<N-1>` when the order has
  /// more than one line item.
  pub name: String,
  pub brand: String,
  pub color: String,
  /// First non-empty line-item image, else empty.
  pub image: String,
  /// Total unit count across all line items.
  pub items_count: u32,
  pub offer_price: f64,

  pub status: CanonicalStatus,
  pub raw_status: String,
  pub created_at: Option<DateTime<Utc>>,

  // Badges.
  pub cancelled_prepaid: bool,
  pub return_eligible: bool,
  pub ineligibility_reason: Option<String>,
  /// Canonical state of the most recent return request, via the
  /// return-variant normalizer. `None` when the order has no history.
  pub latest_return_status: Option<CanonicalStatus>,
  pub return_approved: bool,
}

impl OrderView {
  /// Compose the view for one order from the reconciliation outputs.
  ///
  /// `eligibility` and `history` are `None` for orders the enrichment
  /// phase did not target; both default to "no badge".
  #[must_use]
  pub fn assemble(
    order: &Order,
    cancelled_prepaid: bool,
    eligibility: Option<&EligibilityRecord>,
    history: Option<&ReturnHistory>,
  ) -> Self {
    let first = order.first_item();

    let base_name = first
      .and_then(|item| item.display_name())
      .unwrap_or(NAMELESS_ORDER);
    let name = if order.items.len() > 1 {
      format!("{base_name} +{}", order.items.len() - 1)
    } else {
      base_name.to_string()
    };

    let image = order
      .items
      .iter()
      .find_map(|item| item.image())
      .unwrap_or_default()
      .to_string();

    Self {
      id: order.id.clone(),
      name,
      brand: first
        .and_then(|item| item.display_brand())
        .unwrap_or_default()
        .to_string(),
      color: first
        .and_then(|item| item.display_color())
        .unwrap_or_default()
        .to_string(),
      image,
      items_count: order.items_count(),
      offer_price: order.offer_price(),
      status: order.canonical_status(),
      raw_status: order.status.clone(),
      created_at: order.created_at,
      cancelled_prepaid,
      return_eligible: eligibility.is_some_and(|record| record.eligible),
      ineligibility_reason: eligibility
        .filter(|record| !record.eligible)
        .and_then(|record| record.reason.clone()),
      latest_return_status: history.and_then(ReturnHistory::latest_canonical_status),
      return_approved: history.is_some_and(|h| h.approved),
    }
  }
}
