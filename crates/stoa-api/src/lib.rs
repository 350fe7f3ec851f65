//! JSON API exposing the reconciled account collections.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stoa_core::source::OrderSource`]. Transport and TLS concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stoa_api::account_router(source.clone()))
//! ```

pub mod error;
pub mod orders;

use std::sync::Arc;

use axum::{Router, routing::get};

use stoa_core::source::OrderSource;

pub use error::ApiError;

/// Build a fully-materialised account router for `source`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn account_router<S>(source: Arc<S>) -> Router<()>
where
  S: OrderSource + 'static,
{
  Router::new()
    .route("/orders", get(orders::list::<S>))
    .route("/orders/cancelled-prepaid", get(orders::cancelled_prepaid::<S>))
    .route("/orders/returnable", get(orders::returnable::<S>))
    .with_state(source)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use std::collections::HashMap;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use thiserror::Error;
  use tower::ServiceExt as _;

  use stoa_core::{
    eligibility::EligibilityRecord,
    order::{Order, OrderId},
    returns::ReturnRequest,
    source::CustomerIdentity,
  };
  use stoa_engine::ORDERS_UNAVAILABLE;

  #[derive(Debug, Error)]
  #[error("mock failure")]
  struct MockError;

  #[derive(Default)]
  struct MockSource {
    orders:      Vec<Order>,
    fail_fetch:  bool,
    eligibility: HashMap<OrderId, EligibilityRecord>,
  }

  impl OrderSource for MockSource {
    type Error = MockError;

    async fn orders_for_customer(
      &self,
      _identity: &CustomerIdentity,
    ) -> Result<Vec<Order>, MockError> {
      if self.fail_fetch {
        return Err(MockError);
      }
      Ok(self.orders.clone())
    }

    async fn return_eligibility(
      &self,
      order_id: &OrderId,
    ) -> Result<EligibilityRecord, MockError> {
      Ok(
        self
          .eligibility
          .get(order_id)
          .cloned()
          .unwrap_or_else(|| EligibilityRecord::denied(None)),
      )
    }

    async fn return_requests(
      &self,
      _order_id: &OrderId,
    ) -> Result<Vec<ReturnRequest>, MockError> {
      Ok(Vec::new())
    }
  }

  async fn get_json(source: MockSource, uri: &str) -> (StatusCode, serde_json::Value) {
    let router = account_router(Arc::new(source));
    let resp = router
      .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  fn order(value: serde_json::Value) -> Order {
    serde_json::from_value(value).unwrap()
  }

  #[tokio::test]
  async fn missing_identity_returns_400() {
    let (status, body) = get_json(MockSource::default(), "/orders").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email or a phone"));
  }

  #[tokio::test]
  async fn listing_is_sorted_and_annotated() {
    let source = MockSource {
      orders: vec![
        order(serde_json::json!({
          "id": 2,
          "status": "Cancelled",
          "payment_status": "PAID",
          "items": [{"name": "Bottle"}],
        })),
        order(serde_json::json!({
          "id": 1,
          "status": "Shipped to customer",
          "items": [{"name": "Mug", "qty": 2}],
          "totals": {"payable": 499},
        })),
      ],
      ..MockSource::default()
    };

    let (status, body) = get_json(source, "/orders?email=a@b.example").await;
    assert_eq!(status, StatusCode::OK);

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    // Shipped ranks below Cancelled in the lifecycle sort.
    assert_eq!(orders[0]["id"], "1");
    assert_eq!(orders[0]["name"], "Mug");
    assert_eq!(orders[1]["cancelled_prepaid"], true);
    assert!(body["advisory"].is_null());
  }

  #[tokio::test]
  async fn cancelled_prepaid_subset_excludes_cod() {
    let source = MockSource {
      orders: vec![
        order(serde_json::json!({"id": 1, "status": "Cancelled", "payment_status": "PAID"})),
        order(serde_json::json!({"id": 2, "status": "Cancelled", "payment_status": "COD"})),
      ],
      ..MockSource::default()
    };

    let (status, body) =
      get_json(source, "/orders/cancelled-prepaid?phone=%2B15550100").await;
    assert_eq!(status, StatusCode::OK);

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], "1");
  }

  #[tokio::test]
  async fn returnable_subset_follows_eligibility() {
    let source = MockSource {
      orders: vec![
        order(serde_json::json!({"id": 1, "status": "Delivered"})),
        order(serde_json::json!({"id": 2, "status": "Delivered"})),
      ],
      eligibility: HashMap::from([(OrderId::from(1), EligibilityRecord::allowed())]),
      ..MockSource::default()
    };

    let (status, body) = get_json(source, "/orders/returnable?email=a@b.example").await;
    assert_eq!(status, StatusCode::OK);

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], "1");
    assert_eq!(orders[0]["return_eligible"], true);
  }

  #[tokio::test]
  async fn upstream_failure_returns_200_with_advisory() {
    let source = MockSource { fail_fetch: true, ..MockSource::default() };

    let (status, body) = get_json(source, "/orders?email=a@b.example").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["orders"].as_array().unwrap().is_empty());
    assert_eq!(body["advisory"], ORDERS_UNAVAILABLE);
  }
}
