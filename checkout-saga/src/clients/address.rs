//! Address service adapter (spec §4.1: `GET /address/{id}`).
//!
//! This service is only a consumer; the Address service remains the
//! authority over ownership and existence (spec §3).

use super::http::ResilientHttpClient;
use super::parsing::decode_envelope;
use crate::errors::CheckoutError;
use crate::models::Address;
use crate::principal::RequestContext;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};

/// Abstraction over the Address service.
#[async_trait]
pub trait AddressClient: Send + Sync {
    /// Fetch an address by id.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AddressNotFound`] (404) or
    /// [`CheckoutError::AddressForbidden`] (403) per the downstream status,
    /// or [`CheckoutError::UpstreamContractError`] for anything else.
    async fn get_address(
        &self,
        ctx: &RequestContext,
        address_id: &str,
    ) -> Result<Address, CheckoutError>;
}

/// Live HTTP-backed [`AddressClient`].
pub struct HttpAddressClient {
    http: ResilientHttpClient,
    base_url: String,
}

impl HttpAddressClient {
    #[must_use]
    pub const fn new(http: ResilientHttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl AddressClient for HttpAddressClient {
    async fn get_address(
        &self,
        ctx: &RequestContext,
        address_id: &str,
    ) -> Result<Address, CheckoutError> {
        let url = format!("{}/address/{address_id}", self.base_url);
        let resp = self
            .http
            .authed(Method::GET, &url, &ctx.bearer_token, &ctx.tenant_id)
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("address service unreachable: {e}"))
            })?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Err(CheckoutError::AddressNotFound(address_id.to_string())),
            StatusCode::FORBIDDEN => {
                return Err(CheckoutError::AddressForbidden(address_id.to_string()))
            }
            status if !status.is_success() => {
                return Err(CheckoutError::UpstreamContractError(format!(
                    "address service returned {status}"
                )))
            }
            _ => {}
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            CheckoutError::UpstreamContractError(format!("malformed address response: {e}"))
        })?;
        decode_envelope(&body)
    }
}
