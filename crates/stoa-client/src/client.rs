//! [`HttpSource`] — the reqwest implementation of [`OrderSource`].

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use stoa_core::{
  eligibility::EligibilityRecord,
  order::{Order, OrderId},
  returns::ReturnRequest,
  source::{CustomerIdentity, OrderSource},
};

use crate::{Error, Result};

/// Per-request ceiling; a hung upstream is treated like any other
/// failed call by the engine.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the upstream storefront API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  pub base_url: String,
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the upstream order/returns API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpSource {
  client:   Client,
  base_url: String,
}

impl HttpSource {
  pub fn new(config: SourceConfig) -> Result<Self> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    url: String,
    query: &[(&str, &str)],
  ) -> Result<T> {
    debug!(%url, "GET");
    let resp = self.client.get(&url).query(query).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status { status: resp.status(), url });
    }
    Ok(resp.json().await?)
  }
}

// ─── Wire envelopes ──────────────────────────────────────────────────────────

/// Collection endpoints wrap their payload in `{"rows": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Rows<T> {
  #[serde(default)]
  rows: Vec<T>,
}

/// `GET /orders/{id}/return-eligibility` body.
#[derive(Debug, Deserialize)]
struct EligibilityResponse {
  #[serde(default)]
  ok:     bool,
  #[serde(default)]
  reason: Option<String>,
}

// ─── OrderSource ─────────────────────────────────────────────────────────────

impl OrderSource for HttpSource {
  type Error = Error;

  /// `GET /orders?email=<email>&phone=<phone>`
  async fn orders_for_customer(
    &self,
    identity: &CustomerIdentity,
  ) -> Result<Vec<Order>> {
    identity.validate()?;

    let mut query: Vec<(&str, &str)> = Vec::new();
    if let Some(email) = identity.email() {
      query.push(("email", email));
    }
    if let Some(phone) = identity.phone() {
      query.push(("phone", phone));
    }

    let rows: Rows<Order> = self.get_json(self.url("/orders"), &query).await?;
    Ok(rows.rows)
  }

  /// `GET /orders/{id}/return-eligibility`
  async fn return_eligibility(
    &self,
    order_id: &OrderId,
  ) -> Result<EligibilityRecord> {
    let url = self.url(&format!("/orders/{order_id}/return-eligibility"));
    let body: EligibilityResponse = self.get_json(url, &[]).await?;
    Ok(if body.ok {
      EligibilityRecord::allowed()
    } else {
      EligibilityRecord::denied(body.reason)
    })
  }

  /// `GET /orders/{id}/return-requests`
  async fn return_requests(
    &self,
    order_id: &OrderId,
  ) -> Result<Vec<ReturnRequest>> {
    let url = self.url(&format!("/orders/{order_id}/return-requests"));
    let rows: Rows<ReturnRequest> = self.get_json(url, &[]).await?;
    Ok(rows.rows)
  }
}
