//! Cart service adapter (spec §4.1: `GET /cart`, `DELETE /cart`).

use super::http::ResilientHttpClient;
use super::parsing::decode_envelope;
use crate::errors::CheckoutError;
use crate::models::CartSnapshot;
use crate::principal::RequestContext;
use async_trait::async_trait;
use reqwest::Method;

/// Abstraction over the Cart service, mocked in saga-engine tests.
#[async_trait]
pub trait CartClient: Send + Sync {
    /// Fetch the caller's current cart, fresh (spec §3: never cached
    /// across the saga boundary).
    async fn get_cart(&self, ctx: &RequestContext) -> Result<CartSnapshot, CheckoutError>;

    /// Clear the cart. Best-effort from the saga's point of view; callers
    /// decide whether to propagate or swallow the error.
    async fn clear_cart(&self, ctx: &RequestContext) -> Result<(), CheckoutError>;
}

/// Live HTTP-backed [`CartClient`].
pub struct HttpCartClient {
    http: ResilientHttpClient,
    base_url: String,
}

impl HttpCartClient {
    #[must_use]
    pub const fn new(http: ResilientHttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl CartClient for HttpCartClient {
    async fn get_cart(&self, ctx: &RequestContext) -> Result<CartSnapshot, CheckoutError> {
        let url = format!("{}/cart", self.base_url);
        let resp = self
            .http
            .authed(Method::GET, &url, &ctx.bearer_token, &ctx.tenant_id)
            .send()
            .await
            .map_err(|e| CheckoutError::UpstreamContractError(format!("cart service unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(CheckoutError::UpstreamContractError(format!(
                "cart service returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CheckoutError::UpstreamContractError(format!("malformed cart response: {e}")))?;

        decode_envelope(&body)
    }

    async fn clear_cart(&self, ctx: &RequestContext) -> Result<(), CheckoutError> {
        let url = format!("{}/cart", self.base_url);
        let resp = self
            .http
            .authed(Method::DELETE, &url, &ctx.bearer_token, &ctx.tenant_id)
            .send()
            .await
            .map_err(|e| CheckoutError::UpstreamContractError(format!("cart service unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(CheckoutError::UpstreamContractError(format!(
                "cart clear returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
