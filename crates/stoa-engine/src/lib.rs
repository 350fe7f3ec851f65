//! The reconciliation pass: fetch → classify → enrich → assemble.
//!
//! One pass turns the raw upstream collections into the three derived
//! collections the presentation layer renders. The pass itself never
//! fails: a collection fetch failure degrades to an empty snapshot
//! with an advisory message, and a per-order enrichment failure is
//! substituted with a safe default for that order alone.
//!
//! Phase ordering is strict — the full order list is fetched and
//! classified before any per-order lookup is issued. The per-order
//! eligibility and return-history lookups are then fanned out
//! concurrently and merged back by order identifier, never by arrival
//! order.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use stoa_core::{
  classify::{Classification, classify, sort_by_lifecycle},
  eligibility::EligibilityRecord,
  order::OrderId,
  returns::{ReturnHistory, aggregate_history},
  source::{CustomerIdentity, OrderSource},
  status::CanonicalStatus,
  view::OrderView,
};


// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Advisory shown when the order collection itself cannot be fetched.
pub const ORDERS_UNAVAILABLE: &str =
  "We couldn't load your orders right now. Please try again.";

/// Everything one reconciliation pass produces. Possibly empty, never
/// an error — the advisory string is the only failure signal that
/// crosses this boundary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountSnapshot {
  /// Every order, sorted ascending by canonical lifecycle rank.
  pub orders: Vec<OrderView>,
  /// Cancelled orders still owing a prepaid refund.
  pub cancelled_prepaid: Vec<OrderView>,
  /// Delivered orders the policy check currently permits returning.
  pub returnable: Vec<OrderView>,
  /// Inline notice for the presentation layer; never blocks data that
  /// did load.
  pub advisory: Option<String>,
}

impl AccountSnapshot {
  fn unavailable() -> Self {
    Self {
      advisory: Some(ORDERS_UNAVAILABLE.to_string()),
      ..Self::default()
    }
  }
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

/// Run one full reconciliation pass for `identity`.
pub async fn reconcile<S: OrderSource>(
  source: &S,
  identity: &CustomerIdentity,
) -> AccountSnapshot {
  // Phase one: fetch the full order list.
  let mut orders = match source.orders_for_customer(identity).await {
    Ok(orders) => orders,
    Err(error) => {
      warn!(%error, "order fetch failed; returning empty snapshot");
      return AccountSnapshot::unavailable();
    }
  };

  // Phase two: classify. Pure and synchronous.
  sort_by_lifecycle(&mut orders);
  let classification = classify(&orders);
  debug!(
    total = orders.len(),
    cancelled_prepaid = classification.cancelled_prepaid.len(),
    "classified order list"
  );

  // Phase three: fan out the per-order lookups. Eligibility applies to
  // delivered orders; return history to delivered and cancelled-prepaid
  // ones.
  let delivered = bucket_ids(&classification, CanonicalStatus::Delivered);
  let mut history_targets = delivered.clone();
  history_targets.extend(
    classification
      .cancelled_prepaid
      .iter()
      .map(|order| order.id.clone()),
  );

  let (eligibility, history) = tokio::join!(
    resolve_eligibility(source, &delivered),
    resolve_histories(source, &history_targets),
  );

  // Phase four: assemble views and slice the derived collections.
  let prepaid_ids: HashSet<&OrderId> = classification
    .cancelled_prepaid
    .iter()
    .map(|order| &order.id)
    .collect();

  let views: Vec<OrderView> = orders
    .iter()
    .map(|order| {
      OrderView::assemble(
        order,
        prepaid_ids.contains(&order.id),
        eligibility.get(&order.id),
        history.get(&order.id),
      )
    })
    .collect();

  let cancelled_prepaid =
    views.iter().filter(|v| v.cancelled_prepaid).cloned().collect();
  let returnable = views.iter().filter(|v| v.return_eligible).cloned().collect();

  AccountSnapshot {
    orders: views,
    cancelled_prepaid,
    returnable,
    advisory: None,
  }
}

fn bucket_ids(
  classification: &Classification,
  status: CanonicalStatus,
) -> Vec<OrderId> {
  classification
    .bucket(status)
    .iter()
    .map(|order| order.id.clone())
    .collect()
}

// ─── Per-order fan-out ───────────────────────────────────────────────────────

/// Resolve return eligibility for each order independently and
/// concurrently. A failed lookup is recorded as the ineligible
/// substitute for that order only; sibling results are untouched.
pub async fn resolve_eligibility<S: OrderSource>(
  source: &S,
  order_ids: &[OrderId],
) -> HashMap<OrderId, EligibilityRecord> {
  let lookups = order_ids.iter().map(|order_id| async move {
    let record = match source.return_eligibility(order_id).await {
      Ok(record) => record,
      Err(error) => {
        warn!(order = %order_id, %error, "eligibility lookup failed");
        EligibilityRecord::unavailable()
      }
    };
    (order_id.clone(), record)
  });
  join_all(lookups).await.into_iter().collect()
}

/// Fetch and aggregate the return history of each order, with the same
/// per-order isolation as [`resolve_eligibility`]. A failed lookup
/// leaves that order with an empty history.
pub async fn resolve_histories<S: OrderSource>(
  source: &S,
  order_ids: &[OrderId],
) -> HashMap<OrderId, ReturnHistory> {
  let lookups = order_ids.iter().map(|order_id| async move {
    let history = match source.return_requests(order_id).await {
      Ok(requests) => aggregate_history(requests),
      Err(error) => {
        warn!(order = %order_id, %error, "return-history lookup failed");
        ReturnHistory::default()
      }
    };
    (order_id.clone(), history)
  });
  join_all(lookups).await.into_iter().collect()
}
