//! The checkout saga: forward pipeline, compensation, idempotency, and the
//! read-only helpers built on top of the same [`Downstreams`](engine::Downstreams).

pub mod engine;
pub mod events;
pub mod helpers;
pub mod idempotency;
pub mod pricing;
pub mod state;
pub mod stock_locator;

pub use engine::{complete_checkout, Downstreams};
