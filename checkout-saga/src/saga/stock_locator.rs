//! Stock location selection (C4).
//!
//! Advisory only — the reservation call is the authoritative check (spec
//! §4.4, I4). List order is server-imposed and never re-sorted.

use crate::clients::InventoryClient;
use crate::errors::CheckoutError;
use crate::principal::RequestContext;

/// Pick a warehouse location for `sku` that reports enough available
/// quantity, returning the first such location in the order the Inventory
/// service returned them.
///
/// # Errors
///
/// Returns [`CheckoutError::InsufficientStock`] if no location reports
/// `available_qty >= required_qty`.
pub async fn locate_stock(
    inventory: &dyn InventoryClient,
    ctx: &RequestContext,
    sku: &str,
    required_qty: u32,
) -> Result<String, CheckoutError> {
    let locations = inventory.stock_locations(ctx, sku).await?;

    locations
        .into_iter()
        .find(|loc| loc.available_qty >= required_qty)
        .map(|loc| loc.location_id)
        .ok_or_else(|| CheckoutError::InsufficientStock {
            sku: sku.to_string(),
        })
}
