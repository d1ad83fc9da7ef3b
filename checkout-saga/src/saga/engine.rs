//! The saga engine (C5): forward pipeline, compensation cascade, and error
//! classification for `completeCheckout`.

use crate::clients::{AddressClient, CartClient, InventoryClient, OrderClient, PaymentClient, ReserveLine};
use crate::errors::{CheckoutError, SagaProgress};
use crate::models::{CheckoutComplete, CheckoutRequest, CheckoutStatus};
use crate::principal::RequestContext;
use crate::saga::events::{publish_order_created, OrderCreatedEvent};
use crate::saga::idempotency::resolve_idempotent_retry;
use crate::saga::pricing::price_cart;
use crate::saga::state::SagaState;
use crate::saga::stock_locator::locate_stock;
use saga_core::environment::Clock;
use saga_core::event_bus::EventBus;
use std::sync::Arc;
use uuid::Uuid;

/// Everything the saga engine needs, bundled so handlers don't thread five
/// separate `Arc`s through every call (spec §5: process-wide singletons,
/// fully re-entrant across requests).
pub struct Downstreams {
    pub cart: Arc<dyn CartClient>,
    pub address: Arc<dyn AddressClient>,
    pub inventory: Arc<dyn InventoryClient>,
    pub payment: Arc<dyn PaymentClient>,
    pub order: Arc<dyn OrderClient>,
    pub event_bus: Arc<dyn EventBus>,
    pub clock: Arc<dyn Clock>,
    pub order_created_topic: String,
    pub default_currency: String,
}

impl Downstreams {
    /// Currency to price a fresh shipping quote in when no cart is in scope
    /// yet (spec §4.8: `calculateShipping` takes no cart).
    #[must_use]
    pub fn default_currency_hint(&self) -> String {
        self.default_currency.clone()
    }
}

/// Run the full `completeCheckout` saga (spec §4.5).
///
/// # Errors
///
/// Returns the business error that ended the saga (already translated per
/// spec §4.5's error-translation rule), after running whatever compensation
/// the artifacts produced so far require.
pub async fn complete_checkout(
    downstreams: &Downstreams,
    ctx: &RequestContext,
    user_id: &str,
    req: &CheckoutRequest,
) -> Result<CheckoutComplete, CheckoutError> {
    let cart = downstreams.cart.get_cart(ctx).await?;

    if req.has_retry_signal() && cart.is_empty() {
        return resolve_idempotent_retry(downstreams, ctx, req).await;
    }

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let shipping_address_id = req
        .shipping_address_id
        .as_ref()
        .ok_or(CheckoutError::AddressRequired)?;

    let mut state = SagaState::new();
    match run_forward_pipeline(
        downstreams,
        ctx,
        user_id,
        shipping_address_id,
        req,
        &cart,
        &mut state,
    )
    .await
    {
        Ok(complete) => Ok(complete),
        Err(err) => {
            compensate(downstreams, ctx, &state, &err).await;
            Err(translate_unexpected(err, &state))
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_forward_pipeline(
    downstreams: &Downstreams,
    ctx: &RequestContext,
    user_id: &str,
    shipping_address_id: &str,
    req: &CheckoutRequest,
    cart: &crate::models::CartSnapshot,
    state: &mut SagaState,
) -> Result<CheckoutComplete, CheckoutError> {
    let address = downstreams.address.get_address(ctx, shipping_address_id).await?;
    let price = price_cart(cart, &address)?;

    let temp_order_id = Uuid::new_v4().to_string();
    let mut lines = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        let location_id = locate_stock(
            downstreams.inventory.as_ref(),
            ctx,
            &item.sku,
            item.quantity,
        )
        .await?;
        lines.push(ReserveLine {
            sku: item.sku.clone(),
            location_id,
            quantity: item.quantity,
        });
    }

    downstreams
        .inventory
        .reserve(ctx, &temp_order_id, &lines)
        .await?;
    state.mark_reserved(temp_order_id.clone());

    let payment_id = downstreams
        .payment
        .process(
            ctx,
            &temp_order_id,
            price.total,
            req.payment_method_id.as_deref(),
            req.payment_gateway_transaction_id.as_deref(),
        )
        .await?;
    state.mark_paid(payment_id.clone());

    let order = downstreams
        .order
        .create_order(ctx, shipping_address_id, &payment_id, &cart.items, &price)
        .await?;
    state.mark_order_created(order.order_id.clone(), order.order_number.clone());

    let mut status = CheckoutStatus::Placed;

    if let Err(e) = downstreams.cart.clear_cart(ctx).await {
        tracing::warn!(error = %e, order_id = %order.order_id, "cart clear failed, continuing");
        status = CheckoutStatus::PlacedWithBestEffortFaults;
    }

    let event = OrderCreatedEvent {
        order_id: order.order_id.clone(),
        user_id: user_id.to_string(),
        tenant_id: ctx.tenant_id.clone(),
        timestamp: downstreams.clock.now(),
    };
    publish_order_created(
        downstreams.event_bus.as_ref(),
        &downstreams.order_created_topic,
        &event,
    )
    .await;

    Ok(CheckoutComplete {
        order_id: order.order_id,
        order_number: order.order_number,
        payment_id,
        total: order.total,
        currency: order.currency,
        status,
        created_at: downstreams.clock.now(),
    })
}

/// Run the compensation cascade for whatever artifacts `state` holds,
/// logging failures but never letting them mask `original_err` (spec I2,
/// §4.5 compensation cascade).
async fn compensate(
    downstreams: &Downstreams,
    ctx: &RequestContext,
    state: &SagaState,
    original_err: &CheckoutError,
) {
    let plan = state.compensation_plan();

    if plan.refund_payment {
        if let Some(payment_id) = state.payment_id() {
            if let Err(e) = downstreams
                .payment
                .refund(ctx, payment_id, &format!("checkout failed: {original_err}"))
                .await
            {
                tracing::error!(error = %e, payment_id, "refund compensation failed");
            }
        }
    }

    if plan.release_reservation.is_some() {
        if let Some(reservation_id) = state.reservation_id() {
            if let Err(e) = downstreams.inventory.release(ctx, reservation_id).await {
                tracing::error!(error = %e, reservation_id, "release compensation failed");
            }
        }
    }
}

/// Business errors bubble unchanged; anything else is annotated with saga
/// progress for the support-facing message (spec §4.5, §7).
fn translate_unexpected(err: CheckoutError, state: &SagaState) -> CheckoutError {
    match err {
        CheckoutError::Unexpected { source, .. } => {
            let progress = if let Some(order_id) = state.order_id() {
                SagaProgress::PaymentAndOrder {
                    order_id: order_id.to_string(),
                }
            } else if let Some(payment_id) = state.payment_id() {
                SagaProgress::PaymentOnlyNoOrder {
                    payment_id: payment_id.to_string(),
                }
            } else if state.reservation_id().is_some() {
                SagaProgress::ReservationOnly
            } else {
                SagaProgress::None
            };
            CheckoutError::Unexpected { progress, source }
        }
        business_error => business_error,
    }
}
