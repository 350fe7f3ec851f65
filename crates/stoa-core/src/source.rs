//! The `OrderSource` trait and the customer identity it is keyed by.
//!
//! The trait is implemented by upstream adapters (e.g. `stoa-client`).
//! Higher layers (`stoa-engine`, `stoa-api`) depend on this
//! abstraction, not on any concrete transport.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  eligibility::EligibilityRecord,
  order::{Order, OrderId, non_empty},
  returns::ReturnRequest,
};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Who orders are fetched for. Always passed explicitly — the engine
/// never reads ambient session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerIdentity {
  pub email: Option<String>,
  pub phone: Option<String>,
}

impl CustomerIdentity {
  pub fn with_email(address: impl Into<String>) -> Self {
    Self { email: Some(address.into()), phone: None }
  }

  pub fn with_phone(number: impl Into<String>) -> Self {
    Self { email: None, phone: Some(number.into()) }
  }

  /// Trimmed email, if one was supplied.
  #[must_use]
  pub fn email(&self) -> Option<&str> { non_empty(self.email.as_deref()) }

  /// Trimmed phone number, if one was supplied.
  #[must_use]
  pub fn phone(&self) -> Option<&str> { non_empty(self.phone.as_deref()) }

  /// At least one identifying credential is required to query orders.
  pub fn validate(&self) -> Result<()> {
    if self.email().is_none() && self.phone().is_none() {
      return Err(Error::MissingIdentity);
    }
    Ok(())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the upstream order/returns API.
///
/// All three collections are read-only snapshots. Implementations must
/// keep per-order lookups independent: a failure for one order id is
/// reported through `Result` for that call alone and carries no state
/// into sibling calls.
///
/// All methods return `Send` futures so lookups can be fanned out on a
/// multi-threaded runtime.
pub trait OrderSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every order snapshot recorded for `identity`.
  fn orders_for_customer<'a>(
    &'a self,
    identity: &'a CustomerIdentity,
  ) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send + 'a;

  /// Run the external return-eligibility policy check for one order.
  fn return_eligibility<'a>(
    &'a self,
    order_id: &'a OrderId,
  ) -> impl Future<Output = Result<EligibilityRecord, Self::Error>> + Send + 'a;

  /// Fetch all return requests recorded against one order.
  fn return_requests<'a>(
    &'a self,
    order_id: &'a OrderId,
  ) -> impl Future<Output = Result<Vec<ReturnRequest>, Self::Error>> + Send + 'a;
}
