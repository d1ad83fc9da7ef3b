//! Payment service adapter (spec §4.1, §4.6).
//!
//! `process` must be idempotent by `payment_gateway_transaction_id` per the
//! downstream contract (spec §4.6 step 1); `lookup_by_transaction` is the
//! preferred replacement the design notes recommend (spec §9) and is what
//! this implementation actually uses for the idempotency resolver.

use super::http::ResilientHttpClient;
use super::parsing::{decode_envelope, read_aliased_id};
use crate::errors::CheckoutError;
use crate::money::Money;
use crate::principal::RequestContext;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::json;

/// Abstraction over the Payment service.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Charge `amount`, returning the resulting payment id.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::PaymentDeclined`] (402),
    /// [`CheckoutError::PaymentTimeout`] (504), or
    /// [`CheckoutError::UpstreamContractError`] for any other failure.
    async fn process(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        amount: Money,
        payment_method_id: Option<&str>,
        payment_gateway_transaction_id: Option<&str>,
    ) -> Result<String, CheckoutError>;

    /// Refund a previously successful payment. Used only from the
    /// compensation cascade.
    async fn refund(
        &self,
        ctx: &RequestContext,
        payment_id: &str,
        reason: &str,
    ) -> Result<(), CheckoutError>;

    /// Look up a payment by its client-supplied gateway transaction id,
    /// returning `None` if no such payment exists (spec §4.6 step 2).
    async fn lookup_by_transaction(
        &self,
        ctx: &RequestContext,
        transaction_id: &str,
    ) -> Result<Option<String>, CheckoutError>;
}

/// Live HTTP-backed [`PaymentClient`].
pub struct HttpPaymentClient {
    http: ResilientHttpClient,
    base_url: String,
}

impl HttpPaymentClient {
    #[must_use]
    pub const fn new(http: ResilientHttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn process(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        amount: Money,
        payment_method_id: Option<&str>,
        payment_gateway_transaction_id: Option<&str>,
    ) -> Result<String, CheckoutError> {
        let url = format!("{}/payment/process", self.base_url);
        let resp = self
            .http
            .authed(Method::POST, &url, &ctx.bearer_token, &ctx.tenant_id)
            .timeout(std::time::Duration::from_secs(10))
            .json(&json!({
                "amount": amount.amount(),
                "currency": amount.currency().to_string(),
                "orderId": order_id,
                "paymentMethodId": payment_method_id,
                "paymentGatewayTransactionId": payment_gateway_transaction_id,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CheckoutError::PaymentTimeout
                } else {
                    CheckoutError::UpstreamContractError(format!("payment service unreachable: {e}"))
                }
            })?;

        match resp.status() {
            StatusCode::PAYMENT_REQUIRED | StatusCode::UNPROCESSABLE_ENTITY => {
                return Err(CheckoutError::PaymentDeclined(
                    "payment service declined the charge".to_string(),
                ))
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                return Err(CheckoutError::PaymentTimeout)
            }
            status if !status.is_success() => {
                return Err(CheckoutError::PaymentDeclined(format!(
                    "payment service returned {status}"
                )))
            }
            _ => {}
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            CheckoutError::UpstreamContractError(format!("malformed payment response: {e}"))
        })?;
        let data = decode_data(&body)?;
        read_aliased_id(&data, &["id", "payment_id", "paymentId"], "payment id")
    }

    async fn refund(
        &self,
        ctx: &RequestContext,
        payment_id: &str,
        reason: &str,
    ) -> Result<(), CheckoutError> {
        let url = format!("{}/payment/refund", self.base_url);
        let resp = self
            .http
            .authed(Method::POST, &url, &ctx.bearer_token, &ctx.tenant_id)
            .json(&json!({ "paymentId": payment_id, "reason": reason }))
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("payment service unreachable: {e}"))
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(CheckoutError::UpstreamContractError(format!(
                "payment refund returned {}",
                resp.status()
            )))
        }
    }

    async fn lookup_by_transaction(
        &self,
        ctx: &RequestContext,
        transaction_id: &str,
    ) -> Result<Option<String>, CheckoutError> {
        let url = format!("{}/payment/by-txn/{transaction_id}", self.base_url);
        let resp = self
            .http
            .authed(Method::GET, &url, &ctx.bearer_token, &ctx.tenant_id)
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("payment service unreachable: {e}"))
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(CheckoutError::UpstreamContractError(format!(
                "payment lookup returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            CheckoutError::UpstreamContractError(format!("malformed payment response: {e}"))
        })?;
        let data = decode_data(&body)?;
        read_aliased_id(&data, &["id", "payment_id", "paymentId"], "payment id").map(Some)
    }
}

fn decode_data(body: &serde_json::Value) -> Result<serde_json::Value, CheckoutError> {
    decode_envelope(body)
}
