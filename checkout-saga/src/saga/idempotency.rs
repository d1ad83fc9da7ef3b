//! Idempotency resolver (C6): reconstructs the success response for a
//! retried checkout without re-running anything side-effecting.

use crate::errors::CheckoutError;
use crate::models::{CheckoutComplete, CheckoutRequest, CheckoutStatus};
use crate::principal::RequestContext;
use crate::saga::engine::Downstreams;
use saga_core::environment::Clock;
use std::time::Duration;

/// Delays between `GET /order/by-payment/{id}` attempts (spec §4.6 step 4):
/// covers the window where the payment is recorded but the order row isn't
/// yet visible from a read replica.
const RETRY_DELAYS_MS: [u64; 3] = [0, 200, 400];

/// Resolve a retried `completeCheckout` call that carries a non-empty
/// `paymentGatewayTransactionId` against an already-empty cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if no payment exists for the
/// transaction id (the retry cannot be resolved — spec §4.6 step 2),
/// [`CheckoutError::OrderNotFound`] if the retry loop exhausts all
/// attempts, or [`CheckoutError::UpstreamContractError`] if the order is
/// found but missing a required field.
pub async fn resolve_idempotent_retry(
    downstreams: &Downstreams,
    ctx: &RequestContext,
    req: &CheckoutRequest,
) -> Result<CheckoutComplete, CheckoutError> {
    let transaction_id = req
        .payment_gateway_transaction_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(CheckoutError::EmptyCart)?;

    let payment_id = downstreams
        .payment
        .lookup_by_transaction(ctx, transaction_id)
        .await?
        .ok_or(CheckoutError::EmptyCart)?;

    let mut last_err = None;
    for delay_ms in RETRY_DELAYS_MS {
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        match downstreams.order.find_by_payment(ctx, &payment_id).await {
            Ok(Some(order)) => {
                return Ok(CheckoutComplete {
                    order_id: order.order_id,
                    order_number: order.order_number,
                    payment_id,
                    total: order.total,
                    currency: order.currency,
                    status: CheckoutStatus::Placed,
                    created_at: downstreams.clock.now(),
                });
            }
            Ok(None) => last_err = None,
            Err(e) => last_err = Some(e),
        }
    }

    match last_err {
        Some(e) => Err(e),
        None => Err(CheckoutError::OrderNotFound { payment_id }),
    }
}
