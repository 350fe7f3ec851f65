//! Bucketing of raw orders by canonical status and payment type.
//!
//! Classification is a pure function over the fetched order list: the
//! same input always yields the same bucket membership, and no bucket
//! shares an order with another (cancelled-prepaid and return-eligible
//! are derived from mutually exclusive canonical statuses).

use std::collections::BTreeMap;

use crate::{
  order::Order,
  status::CanonicalStatus,
};

// ─── Cancelled-prepaid predicate ─────────────────────────────────────────────

/// True when the order was cancelled but its payment was captured or
/// pending capture, so a refund is owed. COD cancellations fall
/// through — no money changed hands.
#[must_use]
pub fn is_cancelled_prepaid(order: &Order) -> bool {
  if order.canonical_status() != CanonicalStatus::Cancelled {
    return false;
  }
  let Some(indicator) = order.payment_indicator() else {
    return false;
  };
  let indicator = indicator.to_uppercase();
  indicator.starts_with("PAID")
    || indicator.starts_with("PENDING")
    || indicator == "PREPAID"
}

// ─── Classification ──────────────────────────────────────────────────────────

/// The result of one classification pass.
#[derive(Debug, Clone, Default)]
pub struct Classification {
  /// Cancelled orders that still owe the customer a refund.
  pub cancelled_prepaid: Vec<Order>,
  /// Every order, keyed by canonical status. Within a bucket, orders
  /// keep their fetch order.
  pub by_status: BTreeMap<CanonicalStatus, Vec<Order>>,
}

impl Classification {
  /// The bucket for `status`, empty if no order landed there.
  #[must_use]
  pub fn bucket(&self, status: CanonicalStatus) -> &[Order] {
    self.by_status.get(&status).map_or(&[], Vec::as_slice)
  }
}

/// Classify a fetched order list. Pure and idempotent.
#[must_use]
pub fn classify(orders: &[Order]) -> Classification {
  let mut classification = Classification::default();
  for order in orders {
    if is_cancelled_prepaid(order) {
      classification.cancelled_prepaid.push(order.clone());
    }
    classification
      .by_status
      .entry(order.canonical_status())
      .or_default()
      .push(order.clone());
  }
  classification
}

/// Sort a listing ascending by canonical rank. The sort is stable:
/// orders sharing a rank keep their fetch order — ties are never
/// re-ordered by date.
pub fn sort_by_lifecycle(orders: &mut [Order]) {
  orders.sort_by_key(|order| order.canonical_status().rank());
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::order::OrderId;

  fn order(id: i64, status: &str, payment_status: &str) -> Order {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "status": status,
      "payment_status": payment_status,
    }))
    .unwrap()
  }

  #[test]
  fn cancelled_paid_is_prepaid() {
    assert!(is_cancelled_prepaid(&order(1, "Cancelled by customer", "PAID")));
    assert!(is_cancelled_prepaid(&order(2, "Cancelled", "pending refund")));
    assert!(is_cancelled_prepaid(&order(3, "Cancelled", "PREPAID")));
  }

  #[test]
  fn cancelled_cod_is_not_prepaid() {
    assert!(!is_cancelled_prepaid(&order(1, "Cancelled by customer", "COD")));
  }

  #[test]
  fn prepaid_must_be_exact_while_prefixes_may_trail() {
    assert!(is_cancelled_prepaid(&order(1, "Cancelled", "PAID ONLINE")));
    assert!(!is_cancelled_prepaid(&order(2, "Cancelled", "PREPAID-WALLET")));
  }

  #[test]
  fn delivered_order_is_never_prepaid_cancelled() {
    assert!(!is_cancelled_prepaid(&order(1, "Delivered", "PAID")));
  }

  #[test]
  fn prepaid_indicator_falls_back_to_cancellation_payment_type() {
    let order: Order = serde_json::from_value(serde_json::json!({
      "id": 9,
      "status": "Cancelled",
      "payment_status": "",
      "cancellation_payment_type": "PAID",
    }))
    .unwrap();
    assert!(is_cancelled_prepaid(&order));
  }

  #[test]
  fn classify_buckets_are_disjoint_per_order() {
    let orders = vec![
      order(1, "Shipped to customer", "PAID"),
      order(2, "Cancelled - customer request", "PENDING REFUND"),
      order(3, "Delivered", "COD"),
    ];
    let classification = classify(&orders);

    assert_eq!(classification.bucket(CanonicalStatus::Shipped).len(), 1);
    assert_eq!(classification.bucket(CanonicalStatus::Shipped)[0].id, OrderId::from(1));
    assert_eq!(classification.bucket(CanonicalStatus::Delivered).len(), 1);
    assert_eq!(classification.cancelled_prepaid.len(), 1);
    assert_eq!(classification.cancelled_prepaid[0].id, OrderId::from(2));
    // The cancelled order still appears in its status bucket.
    assert_eq!(classification.bucket(CanonicalStatus::Cancelled).len(), 1);
  }

  #[test]
  fn classify_is_idempotent() {
    let orders = vec![
      order(1, "Shipped", "PAID"),
      order(2, "Cancelled", "PAID"),
      order(3, "", ""),
    ];
    let first = classify(&orders);
    let second = classify(&orders);

    assert_eq!(
      first.cancelled_prepaid.iter().map(|o| &o.id).collect::<Vec<_>>(),
      second.cancelled_prepaid.iter().map(|o| &o.id).collect::<Vec<_>>(),
    );
    for (status, bucket) in &first.by_status {
      let other: Vec<_> = second.bucket(*status).iter().map(|o| &o.id).collect();
      assert_eq!(bucket.iter().map(|o| &o.id).collect::<Vec<_>>(), other);
    }
  }

  #[test]
  fn lifecycle_sort_is_stable_within_rank() {
    let mut orders = vec![
      order(1, "Cancelled", "PAID"),
      order(2, "Delivered", "PAID"),
      order(3, "Cancelled", "COD"),
      order(4, "Order placed", ""),
      order(5, "Delivered", "COD"),
    ];
    sort_by_lifecycle(&mut orders);

    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    // Placed < Delivered < Cancelled; ties keep fetch order.
    assert_eq!(ids, ["4", "2", "5", "1", "3"]);
  }
}
