//! Inventory service adapter (spec §4.1: stock lookup, reserve, release).

use super::http::ResilientHttpClient;
use super::parsing::decode_envelope;
use crate::errors::CheckoutError;
use crate::models::StockLocation;
use crate::principal::RequestContext;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

/// One reserved line item, as submitted to `POST /inventory/reserve`.
#[derive(Debug, Clone)]
pub struct ReserveLine {
    pub sku: String,
    pub location_id: String,
    pub quantity: u32,
}

/// Abstraction over the Inventory service.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// List candidate warehouse locations and their available quantity for
    /// a SKU, in the order the service returns them (spec §4.4: not
    /// re-sorted).
    async fn stock_locations(
        &self,
        ctx: &RequestContext,
        sku: &str,
    ) -> Result<Vec<StockLocation>, CheckoutError>;

    /// Reserve the given lines under `order_id` (the orchestrator's own
    /// `tempOrderId`, spec §9). Failure is surfaced as
    /// [`CheckoutError::InsufficientStock`] naming the first line's SKU —
    /// the caller is expected to have already picked locations that
    /// reported enough stock, so a reserve failure here means the
    /// best-effort pick in C4 lost a race.
    async fn reserve(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        lines: &[ReserveLine],
    ) -> Result<(), CheckoutError>;

    /// Release a previously made reservation. Used only from the
    /// compensation cascade; failures there are logged, not propagated.
    async fn release(&self, ctx: &RequestContext, reservation_id: &str) -> Result<(), CheckoutError>;
}

/// Live HTTP-backed [`InventoryClient`].
pub struct HttpInventoryClient {
    http: ResilientHttpClient,
    base_url: String,
}

impl HttpInventoryClient {
    #[must_use]
    pub const fn new(http: ResilientHttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn stock_locations(
        &self,
        ctx: &RequestContext,
        sku: &str,
    ) -> Result<Vec<StockLocation>, CheckoutError> {
        let url = format!("{}/inventory/stock/{sku}/locations", self.base_url);
        let resp = self
            .http
            .authed(Method::GET, &url, &ctx.bearer_token, &ctx.tenant_id)
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("inventory service unreachable: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(CheckoutError::UpstreamContractError(format!(
                "inventory stock lookup returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            CheckoutError::UpstreamContractError(format!("malformed stock response: {e}"))
        })?;
        decode_envelope(&body)
    }

    async fn reserve(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        lines: &[ReserveLine],
    ) -> Result<(), CheckoutError> {
        let url = format!("{}/inventory/reserve", self.base_url);
        let items: Vec<_> = lines
            .iter()
            .map(|l| {
                json!({
                    "sku": l.sku,
                    "locationId": l.location_id,
                    "quantity": l.quantity,
                })
            })
            .collect();

        let resp = self
            .http
            .authed(Method::POST, &url, &ctx.bearer_token, &ctx.tenant_id)
            .json(&json!({ "orderId": order_id, "items": items }))
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("inventory service unreachable: {e}"))
            })?;

        if resp.status().is_success() {
            return Ok(());
        }

        let sku = lines
            .first()
            .map(|l| l.sku.clone())
            .unwrap_or_else(|| "unknown".to_string());
        Err(CheckoutError::InsufficientStock { sku })
    }

    async fn release(&self, ctx: &RequestContext, reservation_id: &str) -> Result<(), CheckoutError> {
        let url = format!("{}/inventory/release", self.base_url);
        let resp = self
            .http
            .authed(Method::POST, &url, &ctx.bearer_token, &ctx.tenant_id)
            .json(&json!({ "reservationId": reservation_id }))
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("inventory service unreachable: {e}"))
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(CheckoutError::UpstreamContractError(format!(
                "inventory release returned {}",
                resp.status()
            )))
        }
    }
}
