//! Typed adapters for every downstream service the saga talks to (C1).
//!
//! Each adapter is a small trait plus an HTTP-backed implementation, so the
//! saga engine and idempotency resolver can be tested against fakes
//! instead of a live server (spec §10.6).

pub mod address;
pub mod cart;
pub mod http;
pub mod inventory;
pub mod order;
pub mod parsing;
pub mod payment;

pub use address::{AddressClient, HttpAddressClient};
pub use cart::{CartClient, HttpCartClient};
pub use http::ResilientHttpClient;
pub use inventory::{HttpInventoryClient, InventoryClient, ReserveLine};
pub use order::{HttpOrderClient, OrderClient, OrderRecord};
pub use payment::{HttpPaymentClient, PaymentClient};
