//! Exact monetary amounts in integer minor units (cents).
//!
//! Arithmetic is checked; rendering to major units goes through rust_decimal
//! so the decimal point is placed without floating-point conversion.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor-unit decimal places in a major unit.
const MINOR_UNIT_SCALE: u32 = 2;

/// Monetary amount stored as integer minor units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create an amount from minor units (e.g. cents).
    pub fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Get the amount in minor units.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Money(0)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition. Returns None on overflow.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked multiplication by a quantity. Returns None on overflow.
    pub fn checked_mul_qty(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Major-unit representation as a decimal with two places.
    pub fn to_decimal(&self) -> RustDecimal {
        RustDecimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Format in major units with a fixed two decimal places (e.g. "5.00").
    pub fn to_major_string(&self) -> String {
        self.to_decimal().to_string()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major_string())
    }
}
