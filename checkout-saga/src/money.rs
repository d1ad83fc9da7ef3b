//! Decimal money type shared by pricing, the downstream client adapters, and
//! the saga engine's response payloads.
//!
//! Floating point is never used for monetary quantities (spec invariant I3);
//! all arithmetic goes through [`rust_decimal::Decimal`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decimal amount paired with an ISO 4217 currency code.
///
/// Arithmetic between two [`Money`] values of different currencies is a
/// programmer error in this orchestrator (there is no FX conversion, see
/// Non-goals) and panics in debug assertions rather than silently producing
/// a nonsensical total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

/// ISO 4217 currency code, stored as a 3-letter upper-case string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency([u8; 3]);

impl Currency {
    /// Default currency for this deployment (spec §6 configuration).
    pub const INR: Self = Self([b'I', b'N', b'R']);

    /// Build a currency code from a 3-letter string, upper-casing it.
    ///
    /// # Panics
    ///
    /// Panics if `code` is not exactly 3 ASCII letters. Currency codes in
    /// this service always originate from either a fixed constant or an
    /// upstream response that has already been through field validation.
    #[must_use]
    pub fn new(code: &str) -> Self {
        let bytes = code.as_bytes();
        assert!(
            bytes.len() == 3 && bytes.iter().all(u8::is_ascii_alphabetic),
            "currency code must be 3 ASCII letters, got {code:?}"
        );
        Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ])
    }

    #[must_use]
    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Money {
    /// Construct a `Money` value from a decimal amount and currency code.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// The zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Add two amounts in the same currency.
    ///
    /// # Panics
    ///
    /// Panics (debug builds) if the currencies differ. This orchestrator
    /// never mixes currencies within a single cart/order (Non-goal: FX).
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        if self.currency != rhs.currency {
            return None;
        }
        Some(Self::new(self.amount + rhs.amount, self.currency))
    }

    /// Subtract `rhs` from `self`, requiring matching currencies.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        if self.currency != rhs.currency {
            return None;
        }
        Some(Self::new(self.amount - rhs.amount, self.currency))
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
