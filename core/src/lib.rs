//! # Saga Core
//!
//! Shared traits and wire types used across the checkout saga orchestrator:
//! a [`Clock`](environment::Clock) abstraction for testable timestamps, and
//! an [`Event`](event::Event) / [`EventBus`](event_bus::EventBus) pair used
//! by the orchestrator's best-effort `OrderCreated` publication.
//!
//! None of these types are specific to checkout — they are the ambient
//! plumbing any service in this architecture reaches for.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod event;
pub mod event_bus;

/// Environment module - dependency injection traits.
///
/// All external dependencies (time, in this crate's case) are abstracted
/// behind traits and injected via an `Environment` parameter, rather than
/// read from ambient global state.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    ///
    /// # Examples
    ///
    /// ```
    /// use saga_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _now = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time.
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system wall clock.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

}
