//! The checkout domain error taxonomy and its bridge to HTTP responses.
//!
//! Business errors carry exactly the context support needs (a SKU, a
//! payment id) and are re-raised verbatim through the saga engine; they are
//! never wrapped in [`CheckoutError::Unexpected`].

use axum::http::StatusCode;
use saga_web::AppError;

/// Everything that can go wrong completing or inspecting a checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Cart has no items and no retry-resolvable payment.
    #[error("cart is empty")]
    EmptyCart,

    /// `shippingAddressId` missing from the request.
    #[error("shipping address is required")]
    AddressRequired,

    /// Address service reports no such address.
    #[error("address {0} not found")]
    AddressNotFound(String),

    /// Address exists but does not belong to the caller.
    #[error("address {0} is not owned by this account")]
    AddressForbidden(String),

    /// No warehouse location has enough stock for `sku`, or the reserve call
    /// was declined.
    #[error("insufficient stock for sku {sku}")]
    InsufficientStock {
        /// The SKU that could not be reserved.
        sku: String,
    },

    /// Payment service refused the charge, or gateway verification failed.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// The payment process call timed out; the charge may still land.
    #[error("payment request timed out, it may still be processing")]
    PaymentTimeout,

    /// Order service refused the order or returned a malformed body.
    #[error("order creation failed: {0}")]
    OrderCreationFailed(String),

    /// The idempotency resolver exhausted its retry loop without finding
    /// the order the payment belongs to.
    #[error("order for payment {payment_id} not found after retries")]
    OrderNotFound {
        /// The payment identifier the resolver was reconciling.
        payment_id: String,
    },

    /// A required field was missing from an upstream response.
    #[error("upstream contract violation: {0}")]
    UpstreamContractError(String),

    /// No bearer token was available to propagate to a downstream call.
    #[error("no bearer token available for downstream call")]
    AuthTokenMissing,

    /// Anything else, annotated with how far the saga progressed so
    /// support can act on it (spec §7).
    #[error("unexpected error ({progress}): {source}")]
    Unexpected {
        /// Human-readable saga-progress hint (reservation/payment/order).
        progress: SagaProgress,
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },
}

/// How far a saga progressed before an unexpected failure, used to pick the
/// support-facing message in [`CheckoutError::Unexpected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaProgress {
    /// No artifacts produced yet.
    None,
    /// Only the inventory reservation succeeded.
    ReservationOnly,
    /// Payment succeeded but no order exists.
    PaymentOnlyNoOrder {
        /// The payment id to reference in the support message.
        payment_id: String,
    },
    /// Both payment and order exist; only best-effort steps failed.
    PaymentAndOrder {
        /// The order id to reference in the support message.
        order_id: String,
    },
}

impl std::fmt::Display for SagaProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "no progress"),
            Self::ReservationOnly => write!(f, "inventory reserved but payment failed"),
            Self::PaymentOnlyNoOrder { payment_id } => {
                write!(f, "payment {payment_id} processed; order creation failed")
            }
            Self::PaymentAndOrder { order_id } => {
                write!(f, "order {order_id} created with warnings")
            }
        }
    }
}

impl CheckoutError {
    /// User-facing message for [`CheckoutError::Unexpected`], matching the
    /// wording contract in spec §7.
    #[must_use]
    pub fn support_message(&self) -> Option<String> {
        match self {
            Self::Unexpected { progress, .. } => Some(match progress {
                SagaProgress::None => "An unexpected error occurred.".to_string(),
                SagaProgress::ReservationOnly => {
                    "Inventory reserved but payment failed. Please try again.".to_string()
                }
                SagaProgress::PaymentOnlyNoOrder { payment_id } => format!(
                    "Payment processed; order creation failed. Contact support with payment id {payment_id}."
                ),
                SagaProgress::PaymentAndOrder { order_id } => format!(
                    "Order created but completion had warnings. Order id {order_id}."
                ),
            }),
            _ => None,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => AppError::bad_request(err.to_string()),
            CheckoutError::AddressRequired => AppError::bad_request(err.to_string()),
            CheckoutError::AddressNotFound(id) => AppError::not_found("Address", id),
            CheckoutError::AddressForbidden(_) => AppError::forbidden(err.to_string()),
            CheckoutError::InsufficientStock { .. } => AppError::conflict(err.to_string()),
            CheckoutError::PaymentDeclined(_) => {
                AppError::new(StatusCode::PAYMENT_REQUIRED, err.to_string(), "PAYMENT_DECLINED".to_string())
            }
            CheckoutError::PaymentTimeout => AppError::new(
                StatusCode::GATEWAY_TIMEOUT,
                err.to_string(),
                "PAYMENT_TIMEOUT".to_string(),
            ),
            CheckoutError::OrderCreationFailed(_) => AppError::internal(err.to_string()),
            CheckoutError::OrderNotFound { payment_id } => {
                AppError::not_found("Order for payment", payment_id)
            }
            CheckoutError::UpstreamContractError(_) => AppError::new(
                StatusCode::BAD_GATEWAY,
                err.to_string(),
                "UPSTREAM_CONTRACT_ERROR".to_string(),
            ),
            CheckoutError::AuthTokenMissing => AppError::internal(err.to_string()),
            CheckoutError::Unexpected { .. } => {
                #[allow(clippy::unwrap_used)]
                let message = err.support_message().unwrap();
                AppError::internal(message)
            }
        }
    }
}
