//! Order service adapter (spec §4.1: `POST /order`, `GET /order/by-payment/{id}`).

use super::http::ResilientHttpClient;
use super::parsing::read_aliased_id;
use crate::errors::CheckoutError;
use crate::models::{CartItem, PriceBreakdown};
use crate::principal::RequestContext;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

/// An order as created or looked up, with just the fields the saga needs
/// to build its response (spec §4.6 step 5).
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_number: String,
    pub total: Decimal,
    pub currency: String,
}

/// Abstraction over the Order service.
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// Create the order for a paid-for cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::OrderCreationFailed`] if the order service
    /// refuses the request or returns a malformed body.
    #[allow(clippy::too_many_arguments)]
    async fn create_order(
        &self,
        ctx: &RequestContext,
        shipping_address_id: &str,
        payment_id: &str,
        items: &[CartItem],
        price: &PriceBreakdown,
    ) -> Result<OrderRecord, CheckoutError>;

    /// Look up the order created for a given payment (spec §4.6 step 3).
    /// Returns `None` on a 404 so the idempotency resolver's retry loop can
    /// distinguish "not yet visible" from a hard failure.
    async fn find_by_payment(
        &self,
        ctx: &RequestContext,
        payment_id: &str,
    ) -> Result<Option<OrderRecord>, CheckoutError>;
}

/// Live HTTP-backed [`OrderClient`].
pub struct HttpOrderClient {
    http: ResilientHttpClient,
    base_url: String,
}

impl HttpOrderClient {
    #[must_use]
    pub const fn new(http: ResilientHttpClient, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl OrderClient for HttpOrderClient {
    async fn create_order(
        &self,
        ctx: &RequestContext,
        shipping_address_id: &str,
        payment_id: &str,
        items: &[CartItem],
        price: &PriceBreakdown,
    ) -> Result<OrderRecord, CheckoutError> {
        let url = format!("{}/order", self.base_url);
        let items: Vec<_> = items
            .iter()
            .map(|i| {
                json!({
                    "productId": i.product_id,
                    "sku": i.sku,
                    "quantity": i.quantity,
                    "unitPrice": i.unit_price,
                    "totalPrice": i.total_price,
                })
            })
            .collect();

        let resp = self
            .http
            .authed(Method::POST, &url, &ctx.bearer_token, &ctx.tenant_id)
            .json(&json!({
                "shippingAddressId": shipping_address_id,
                "paymentId": payment_id,
                "items": items,
                "subtotal": price.subtotal.amount(),
                "discountAmount": price.discount.amount(),
                "taxAmount": price.tax.amount(),
                "shippingCost": price.shipping.amount(),
                "total": price.total.amount(),
                "currency": price.total.currency().to_string(),
            }))
            .send()
            .await
            .map_err(|e| {
                CheckoutError::OrderCreationFailed(format!("order service unreachable: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(CheckoutError::OrderCreationFailed(format!(
                "order service returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CheckoutError::OrderCreationFailed(format!("malformed order response: {e}")))?;
        parse_order_record(&body)
    }

    async fn find_by_payment(
        &self,
        ctx: &RequestContext,
        payment_id: &str,
    ) -> Result<Option<OrderRecord>, CheckoutError> {
        let url = format!("{}/order/by-payment/{payment_id}", self.base_url);
        let resp = self
            .http
            .authed(Method::GET, &url, &ctx.bearer_token, &ctx.tenant_id)
            .send()
            .await
            .map_err(|e| {
                CheckoutError::UpstreamContractError(format!("order service unreachable: {e}"))
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(CheckoutError::UpstreamContractError(format!(
                "order lookup returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            CheckoutError::UpstreamContractError(format!("malformed order response: {e}"))
        })?;
        parse_order_record(&body).map(Some)
    }
}

fn parse_order_record(body: &serde_json::Value) -> Result<OrderRecord, CheckoutError> {
    let data = body.get("data").unwrap_or(body);

    let order_id = read_aliased_id(data, &["id", "order_id", "orderId"], "order id")?;
    let order_number = read_aliased_id(data, &["order_number", "orderNumber"], "order number")?;
    let total_str = read_aliased_id(data, &["total"], "total")?;
    let total = Decimal::from_str(&total_str)
        .map_err(|e| CheckoutError::UpstreamContractError(format!("invalid total {total_str}: {e}")))?;
    let currency = read_aliased_id(data, &["currency"], "currency").unwrap_or_else(|_| "INR".to_string());

    Ok(OrderRecord {
        order_id,
        order_number,
        total,
        currency,
    })
}
