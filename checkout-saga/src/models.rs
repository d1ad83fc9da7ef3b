//! Request/response DTOs for the checkout HTTP surface and the downstream
//! client adapters.
//!
//! Wire field names are `snake_case` (spec §6); downstream envelopes are
//! parsed defensively with multiple accepted aliases per field (spec §4.1)
//! since each backend service evolved its own casing independently.

use crate::money::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inbound request for `/initiate` and `/complete`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    /// Shipping address identifier. Required to place an order.
    pub shipping_address_id: Option<String>,
    /// Saved payment-instrument reference.
    pub payment_method_id: Option<String>,
    /// Opaque transaction id from a client-side gateway SDK.
    ///
    /// When set and the cart is empty, this request is a retry (spec §4.5
    /// step 1), not a fresh checkout.
    pub payment_gateway_transaction_id: Option<String>,
    /// Cart to check out; defaults to the caller's current cart.
    pub cart_id: Option<String>,
}

impl CheckoutRequest {
    #[must_use]
    pub fn has_retry_signal(&self) -> bool {
        self.payment_gateway_transaction_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

/// One line item in a cart.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// The cart as fetched fresh at saga start (never cached across the saga).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str", alias = "discount_amount")]
    pub discount_amount: Decimal,
    pub currency: String,
}

impl CartSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn subtotal_money(&self) -> Money {
        Money::new(self.subtotal, Currency::new(&self.currency))
    }

    #[must_use]
    pub fn discount_money(&self) -> Money {
        Money::new(self.discount_amount, Currency::new(&self.currency))
    }
}

/// A shipping address, authoritative in the Address service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Address {
    pub id: String,
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

/// A candidate warehouse location for a SKU, with its available quantity.
///
/// The inventory service reports this shape in `camelCase`
/// (`locationId`/`availableQty`, spec §4.1); every other boundary on this
/// surface is `snake_case`, so this struct aliases rather than renaming.
#[derive(Debug, Clone, Deserialize)]
pub struct StockLocation {
    #[serde(alias = "locationId")]
    pub location_id: String,
    #[serde(alias = "availableQty")]
    pub available_qty: u32,
}

/// Computed price breakdown (C3 Pricing), also the shared shape echoed back
/// in the success response.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

/// Response body for a successfully placed (or best-effort-faulted) order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckoutComplete {
    pub order_id: String,
    pub order_number: String,
    pub payment_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub currency: String,
    pub status: CheckoutStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Terminal state reported in [`CheckoutComplete`] (spec §4.5 state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStatus {
    Placed,
    PlacedWithBestEffortFaults,
}

/// Read-only dry-run summary returned by `/initiate` (C8).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckoutSummary {
    pub price: PriceBreakdown,
    pub items_available: bool,
}

/// Request body for `/address/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressValidationRequest {
    pub line1: String,
    pub city: String,
    pub country: String,
}

/// Response body for `/address/validate`.
#[derive(Debug, Clone, Serialize)]
pub struct AddressValidationResponse {
    pub valid: bool,
}

/// Request body for `/shipping/calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingCalculationRequest {
    pub cart_id: Option<String>,
}

/// A single shipping option (spec §4.8 `calculateShipping`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShippingOption {
    pub code: &'static str,
    pub eta_days: u32,
    pub cost: Money,
}

/// Response body for `/shipping/calculate`.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingCalculationResponse {
    pub options: Vec<ShippingOption>,
}

/// The uniform envelope every HTTP response on this surface is wrapped in
/// (spec §6: `{ data, message, status, timestamp }`).
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub message: String,
    pub status: u16,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn ok(data: T, status: axum::http::StatusCode, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            data,
            message: "ok".to_string(),
            status: status.as_u16(),
            timestamp: now,
        }
    }
}
