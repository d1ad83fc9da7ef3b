//! Read-only helpers (C8): `initiateCheckout`, `cancelCheckout`,
//! `validateAddress`, `calculateShipping`.

use crate::clients::InventoryClient;
use crate::errors::CheckoutError;
use crate::models::{
    AddressValidationRequest, AddressValidationResponse, CheckoutRequest, CheckoutSummary,
    ShippingCalculationResponse, ShippingOption,
};
use crate::money::{Currency, Money};
use crate::principal::RequestContext;
use crate::saga::engine::Downstreams;
use crate::saga::pricing::{price_cart, SHIPPING_FLAT_FEE};
use crate::saga::stock_locator::locate_stock;

/// Dry-run summary: price the cart and probe stock availability, making no
/// state changes (spec §4.8).
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] or [`CheckoutError::AddressRequired`]
/// under the same conditions as `completeCheckout`'s validate step.
pub async fn initiate_checkout(
    downstreams: &Downstreams,
    ctx: &RequestContext,
    req: &CheckoutRequest,
) -> Result<CheckoutSummary, CheckoutError> {
    let cart = downstreams.cart.get_cart(ctx).await?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let shipping_address_id = req
        .shipping_address_id
        .as_ref()
        .ok_or(CheckoutError::AddressRequired)?;
    let address = downstreams.address.get_address(ctx, shipping_address_id).await?;
    let price = price_cart(&cart, &address)?;

    let mut items_available = true;
    for item in &cart.items {
        if locate_stock(downstreams.inventory.as_ref(), ctx, &item.sku, item.quantity)
            .await
            .is_err()
        {
            items_available = false;
            break;
        }
    }

    Ok(CheckoutSummary {
        price,
        items_available,
    })
}

/// Release a reservation if one is supplied; no-op otherwise (spec §4.8).
///
/// # Errors
///
/// Propagates whatever error the Inventory service's release call returns.
pub async fn cancel_checkout(
    inventory: &dyn InventoryClient,
    ctx: &RequestContext,
    reservation_id: Option<&str>,
) -> Result<(), CheckoutError> {
    match reservation_id {
        Some(id) => inventory.release(ctx, id).await,
        None => Ok(()),
    }
}

/// `valid = line1 && city && country all non-empty` (spec §4.8).
#[must_use]
pub fn validate_address(req: &AddressValidationRequest) -> AddressValidationResponse {
    let valid = !req.line1.trim().is_empty()
        && !req.city.trim().is_empty()
        && !req.country.trim().is_empty();
    AddressValidationResponse { valid }
}

/// Two fixed shipping options: `STANDARD` (5 days, flat fee) and `EXPRESS`
/// (2 days, 1.5x standard) (spec §4.8).
#[must_use]
pub fn calculate_shipping(currency: &str) -> ShippingCalculationResponse {
    let currency = Currency::new(currency);
    let standard_cost = SHIPPING_FLAT_FEE;
    let express_cost = standard_cost * rust_decimal_macros::dec!(1.5);

    ShippingCalculationResponse {
        options: vec![
            ShippingOption {
                code: "STANDARD",
                eta_days: 5,
                cost: Money::new(standard_cost, currency),
            },
            ShippingOption {
                code: "EXPRESS",
                eta_days: 2,
                cost: Money::new(express_cost, currency),
            },
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validate_address_requires_all_three_fields() {
        let valid = validate_address(&AddressValidationRequest {
            line1: "1 Main St".to_string(),
            city: "Bengaluru".to_string(),
            country: "IN".to_string(),
        });
        assert!(valid.valid);

        let invalid = validate_address(&AddressValidationRequest {
            line1: String::new(),
            city: "Bengaluru".to_string(),
            country: "IN".to_string(),
        });
        assert!(!invalid.valid);
    }

    #[test]
    fn shipping_options_are_standard_and_express() {
        let resp = calculate_shipping("INR");
        assert_eq!(resp.options.len(), 2);
        assert_eq!(resp.options[0].code, "STANDARD");
        assert_eq!(resp.options[0].cost.amount(), dec!(10.00));
        assert_eq!(resp.options[1].code, "EXPRESS");
        assert_eq!(resp.options[1].cost.amount(), dec!(15.00));
    }
}
