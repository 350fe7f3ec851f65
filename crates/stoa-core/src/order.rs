//! Order and line-item snapshots as fetched from the upstream API.
//!
//! Upstream payloads are loosely shaped: identifiers arrive as strings
//! or numbers, most fields may be absent, and the same logical value
//! hides behind several possible field names. Every field except the
//! identifier is defaulted on deserialization, and each probed value
//! is exposed through one ordered accessor chain rather than ad hoc
//! conditionals at call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::status::{CanonicalStatus, normalize_order_status};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// An opaque order identifier. The upstream sends either a JSON string
/// or a JSON number; both are carried as text and compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrderId(String);

impl OrderId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  #[must_use]
  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for OrderId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for OrderId {
  fn from(id: &str) -> Self { Self(id.to_string()) }
}

impl From<i64> for OrderId {
  fn from(id: i64) -> Self { Self(id.to_string()) }
}

impl<'de> Deserialize<'de> for OrderId {
  fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
      Number(i64),
      Text(String),
    }
    Ok(match Repr::deserialize(de)? {
      Repr::Number(n) => Self(n.to_string()),
      Repr::Text(s) => Self(s),
    })
  }
}

// ─── Lenient field decoding ──────────────────────────────────────────────────

/// Best-effort RFC 3339 timestamp: absent, null, or unparseable input
/// becomes `None` instead of failing the whole collection.
pub(crate) fn lenient_datetime<'de, D: Deserializer<'de>>(
  de: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
  let raw = Option::<serde_json::Value>::deserialize(de)?;
  Ok(raw.as_ref().and_then(|v| match v {
    serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
      .ok()
      .map(|dt| dt.with_timezone(&Utc)),
    _ => None,
  }))
}

/// Identifier fields other than the order id: string or number, else
/// `None`.
pub(crate) fn lenient_id<'de, D: Deserializer<'de>>(
  de: D,
) -> Result<Option<String>, D::Error> {
  let raw = Option::<serde_json::Value>::deserialize(de)?;
  Ok(raw.and_then(|v| match v {
    serde_json::Value::String(s) => Some(s),
    serde_json::Value::Number(n) => Some(n.to_string()),
    _ => None,
  }))
}

/// Trimmed non-empty view of an optional text field.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
  let trimmed = value?.trim();
  (!trimmed.is_empty()).then_some(trimmed)
}

// ─── Line items ──────────────────────────────────────────────────────────────

/// One line of an order. Name and colour are probed across the field
/// names seen in the wild; the accessor methods define the precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
  #[serde(default)]
  pub product_name: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub title: Option<String>,

  #[serde(default)]
  pub brand: Option<String>,

  #[serde(default)]
  pub color: Option<String>,
  #[serde(default)]
  pub colour: Option<String>,
  #[serde(default)]
  pub variant_color: Option<String>,
  #[serde(default, rename = "variantColor")]
  pub variant_color_camel: Option<String>,

  #[serde(default)]
  pub image: Option<String>,

  #[serde(default, alias = "quantity")]
  pub qty: Option<u32>,
}

impl LineItem {
  /// Ordered name probe: `product_name`, `name`, `title`.
  #[must_use]
  pub fn display_name(&self) -> Option<&str> {
    non_empty(self.product_name.as_deref())
      .or_else(|| non_empty(self.name.as_deref()))
      .or_else(|| non_empty(self.title.as_deref()))
  }

  /// Ordered colour probe: `color`, `colour`, `variant_color`,
  /// `variantColor`.
  #[must_use]
  pub fn display_color(&self) -> Option<&str> {
    non_empty(self.color.as_deref())
      .or_else(|| non_empty(self.colour.as_deref()))
      .or_else(|| non_empty(self.variant_color.as_deref()))
      .or_else(|| non_empty(self.variant_color_camel.as_deref()))
  }

  #[must_use]
  pub fn display_brand(&self) -> Option<&str> { non_empty(self.brand.as_deref()) }

  #[must_use]
  pub fn image(&self) -> Option<&str> { non_empty(self.image.as_deref()) }

  /// Missing quantity counts as one unit.
  #[must_use]
  pub fn quantity(&self) -> u32 { self.qty.unwrap_or(1) }
}

// ─── Totals ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrderTotals {
  #[serde(default)]
  pub payable: f64,
  #[serde(default)]
  pub total: f64,
}

// ─── Order ───────────────────────────────────────────────────────────────────

/// An immutable order snapshot. Fetched fresh on every reconciliation
/// pass; never mutated or cached across passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,

  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub payment_status: String,

  #[serde(default, deserialize_with = "lenient_datetime")]
  pub created_at: Option<DateTime<Utc>>,

  #[serde(default)]
  pub items: Vec<LineItem>,
  #[serde(default)]
  pub totals: OrderTotals,
  /// Some upstream shapes carry the grand total at the top level.
  #[serde(default)]
  pub total: f64,

  // Cancellation metadata — populated only for cancelled orders.
  #[serde(default)]
  pub cancellation_reason: Option<String>,
  #[serde(default)]
  pub cancellation_source: Option<String>,
  #[serde(default)]
  pub cancellation_payment_type: Option<String>,
  #[serde(default, deserialize_with = "lenient_datetime")]
  pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
  /// The canonical lifecycle state derived from the raw status.
  #[must_use]
  pub fn canonical_status(&self) -> CanonicalStatus {
    normalize_order_status(&self.status)
  }

  /// Payment indicator probe: `payment_status`, then
  /// `cancellation_payment_type`; first non-empty wins.
  #[must_use]
  pub fn payment_indicator(&self) -> Option<&str> {
    non_empty(Some(self.payment_status.as_str()))
      .or_else(|| non_empty(self.cancellation_payment_type.as_deref()))
  }

  /// The line item that provides the order's display identity.
  #[must_use]
  pub fn first_item(&self) -> Option<&LineItem> { self.items.first() }

  /// Total unit count across all line items; an empty order is zero.
  /// Quantities are upstream-controlled, so the sum saturates instead
  /// of overflowing.
  #[must_use]
  pub fn items_count(&self) -> u32 {
    self
      .items
      .iter()
      .fold(0u32, |count, item| count.saturating_add(item.quantity()))
  }

  /// First non-zero of `totals.payable`, `totals.total`, top-level
  /// `total`; zero when no amount is known.
  #[must_use]
  pub fn offer_price(&self) -> f64 {
    [self.totals.payable, self.totals.total, self.total]
      .into_iter()
      .find(|amount| *amount != 0.0)
      .unwrap_or(0.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn order_id_accepts_string_and_number() {
    let from_text: OrderId = serde_json::from_str(r#""ORD-17""#).unwrap();
    assert_eq!(from_text.as_str(), "ORD-17");

    let from_number: OrderId = serde_json::from_str("42").unwrap();
    assert_eq!(from_number.as_str(), "42");
  }

  #[test]
  fn minimal_payload_deserializes_with_defaults() {
    let order: Order = serde_json::from_str(r#"{"id": 7}"#).unwrap();
    assert_eq!(order.id, OrderId::from(7));
    assert_eq!(order.status, "");
    assert!(order.items.is_empty());
    assert_eq!(order.offer_price(), 0.0);
    assert_eq!(order.items_count(), 0);
    assert!(order.created_at.is_none());
  }

  #[test]
  fn garbage_timestamp_becomes_none() {
    let order: Order =
      serde_json::from_str(r#"{"id": 1, "created_at": "yesterday-ish"}"#).unwrap();
    assert!(order.created_at.is_none());

    let order: Order = serde_json::from_str(
      r#"{"id": 1, "created_at": "2024-03-01T10:30:00Z"}"#,
    )
    .unwrap();
    assert!(order.created_at.is_some());
  }

  #[test]
  fn name_probe_precedence() {
    let item = LineItem {
      name: Some("fallback".into()),
      product_name: Some("Mug".into()),
      ..LineItem::default()
    };
    assert_eq!(item.display_name(), Some("Mug"));

    let item = LineItem {
      product_name: Some("   ".into()),
      title: Some("Bottle".into()),
      ..LineItem::default()
    };
    assert_eq!(item.display_name(), Some("Bottle"));
  }

  #[test]
  fn color_probe_precedence() {
    let item = LineItem {
      colour: Some("teal".into()),
      variant_color_camel: Some("green".into()),
      ..LineItem::default()
    };
    assert_eq!(item.display_color(), Some("teal"));

    let item: LineItem = serde_json::from_str(r#"{"variantColor": "red"}"#).unwrap();
    assert_eq!(item.display_color(), Some("red"));
  }

  #[test]
  fn quantity_defaults_to_one_unit() {
    let item = LineItem::default();
    assert_eq!(item.quantity(), 1);

    let item: LineItem = serde_json::from_str(r#"{"quantity": 3}"#).unwrap();
    assert_eq!(item.quantity(), 3);
  }

  #[test]
  fn items_count_saturates_on_absurd_quantities() {
    let order: Order = serde_json::from_str(
      r#"{"id": 1, "items": [{"qty": 4294967295}, {"qty": 2}]}"#,
    )
    .unwrap();
    assert_eq!(order.items_count(), u32::MAX);
  }

  #[test]
  fn payment_indicator_falls_back_to_cancellation_field() {
    let order: Order = serde_json::from_str(
      r#"{"id": 1, "payment_status": "", "cancellation_payment_type": "PREPAID"}"#,
    )
    .unwrap();
    assert_eq!(order.payment_indicator(), Some("PREPAID"));
  }

  #[test]
  fn offer_price_chain() {
    let mut order: Order = serde_json::from_str(r#"{"id": 1}"#).unwrap();
    order.totals.total = 120.0;
    order.total = 99.0;
    assert_eq!(order.offer_price(), 120.0);

    order.totals.payable = 499.0;
    assert_eq!(order.offer_price(), 499.0);

    order.totals = OrderTotals::default();
    assert_eq!(order.offer_price(), 99.0);
  }
}
