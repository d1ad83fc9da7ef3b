//! Deterministic, side-effect-free price computation (C3).
//!
//! Policies are deliberately simple placeholders (spec §4.3, §9): no tax
//! engine, a flat shipping fee. Kept easy to replace.

use crate::errors::CheckoutError;
use crate::models::{Address, CartSnapshot, PriceBreakdown};
use crate::money::{Currency, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flat shipping fee placeholder (spec §4.3).
pub const SHIPPING_FLAT_FEE: Decimal = dec!(10.00);

/// Compute `{subtotal, discount, tax, shipping, total}` for a cart and
/// shipping address.
///
/// The address is accepted (not currently used beyond validating it was
/// resolved) because a real tax/shipping-rate policy would need it; this
/// keeps the signature stable for that future replacement.
///
/// # Errors
///
/// Returns [`CheckoutError::Unexpected`] if I3 (money conservation) would
/// be violated — in practice this can only happen if `discount_amount`
/// exceeds `subtotal` in the upstream cart.
pub fn price_cart(
    cart: &CartSnapshot,
    _address: &Address,
) -> Result<PriceBreakdown, CheckoutError> {
    let currency = Currency::new(&cart.currency);
    let subtotal = Money::new(cart.subtotal, currency);
    let discount = Money::new(cart.discount_amount, currency);

    if discount.amount() > subtotal.amount() {
        return Err(CheckoutError::Unexpected {
            progress: crate::errors::SagaProgress::None,
            source: anyhow::anyhow!(
                "discount {} exceeds subtotal {} (I3 violation)",
                discount.amount(),
                subtotal.amount()
            ),
        });
    }

    let tax = Money::zero(currency);
    let shipping = Money::new(SHIPPING_FLAT_FEE, currency);

    let total = subtotal
        .checked_sub(discount)
        .and_then(|t| t.checked_add(tax))
        .and_then(|t| t.checked_add(shipping))
        .ok_or_else(|| CheckoutError::Unexpected {
            progress: crate::errors::SagaProgress::None,
            source: anyhow::anyhow!("currency mismatch computing total"),
        })?;

    Ok(PriceBreakdown {
        subtotal,
        discount,
        tax,
        shipping,
        total,
    })
}
