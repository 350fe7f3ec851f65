//! Handlers for the `/orders` collection endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/orders` | Full listing, lifecycle-sorted |
//! | `GET`  | `/orders/cancelled-prepaid` | Refund-owed subset |
//! | `GET`  | `/orders/returnable` | Return-eligible subset |
//!
//! All three take `?email=<addr>&phone=<number>`; at least one of the
//! two is required.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use stoa_core::{source::{CustomerIdentity, OrderSource}, view::OrderView};
use stoa_engine::{AccountSnapshot, reconcile};

use crate::error::ApiError;

// ─── Request/response shapes ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct IdentityParams {
  pub email: Option<String>,
  pub phone: Option<String>,
}

impl IdentityParams {
  fn into_identity(self) -> Result<CustomerIdentity, ApiError> {
    let identity = CustomerIdentity { email: self.email, phone: self.phone };
    identity
      .validate()
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(identity)
  }
}

/// Body shared by all three collection endpoints.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
  pub orders:   Vec<OrderView>,
  /// Inline notice when the upstream collection could not be loaded.
  pub advisory: Option<String>,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /orders`
pub async fn list<S: OrderSource>(
  State(source): State<Arc<S>>,
  Query(params): Query<IdentityParams>,
) -> Result<Json<OrdersResponse>, ApiError> {
  let identity = params.into_identity()?;
  let snapshot = reconcile(source.as_ref(), &identity).await;
  Ok(Json(OrdersResponse {
    orders:   snapshot.orders,
    advisory: snapshot.advisory,
  }))
}

/// `GET /orders/cancelled-prepaid`
pub async fn cancelled_prepaid<S: OrderSource>(
  State(source): State<Arc<S>>,
  Query(params): Query<IdentityParams>,
) -> Result<Json<OrdersResponse>, ApiError> {
  let identity = params.into_identity()?;
  let AccountSnapshot { cancelled_prepaid, advisory, .. } =
    reconcile(source.as_ref(), &identity).await;
  Ok(Json(OrdersResponse { orders: cancelled_prepaid, advisory }))
}

/// `GET /orders/returnable`
pub async fn returnable<S: OrderSource>(
  State(source): State<Arc<S>>,
  Query(params): Query<IdentityParams>,
) -> Result<Json<OrdersResponse>, ApiError> {
  let identity = params.into_identity()?;
  let AccountSnapshot { returnable, advisory, .. } =
    reconcile(source.as_ref(), &identity).await;
  Ok(Json(OrdersResponse { orders: returnable, advisory }))
}
