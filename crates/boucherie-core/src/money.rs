//! # Money and Weight
//!
//! Integer-based monetary and weight types.
//!
//! ## Why Integers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                     │
//! │                                                                 │
//! │  0.1 + 0.2 = 0.30000000000000004  ❌                            │
//! │                                                                 │
//! │  OUR SOLUTION: cents for money, grams for weight                │
//! │    12.99 €/kg × 1.5 kg = 1299 cents × 1500 g                   │
//! │    → (1299 × 1500 + 500) / 1000 = 1949 cents                   │
//! │    Rounding happens once, explicitly, at the gram→cent boundary │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// =============================================================================
// Money
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that refunds and balance deltas can be expressed; the ledger
/// invariants keep persisted amounts non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (euros).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a per-kilogram price by a weight, rounding to the
    /// nearest cent (half away from zero).
    ///
    /// This is the one place fractional cents can appear; i128 keeps the
    /// intermediate product from overflowing on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use boucherie_core::money::{Money, Weight};
    ///
    /// let price = Money::from_cents(1299);        // 12.99 €/kg
    /// let qty = Weight::from_grams(1500);         // 1.5 kg
    /// assert_eq!(price.multiply_weight(qty).cents(), 1949);
    /// ```
    pub fn multiply_weight(&self, weight: Weight) -> Money {
        let product = self.0 as i128 * weight.grams() as i128;
        let rounded = if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        };
        Money::from_cents(rounded as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} €", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

// =============================================================================
// Weight
// =============================================================================

/// A weight in grams.
///
/// Meat is sold by the kilogram but cut to the gram; storing grams keeps
/// quantities exact where a fractional-kilogram float would drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(i64);

impl Weight {
    /// Creates a weight from grams.
    #[inline]
    pub const fn from_grams(grams: i64) -> Self {
        Weight(grams)
    }

    /// Returns the weight in grams.
    #[inline]
    pub const fn grams(&self) -> i64 {
        self.0
    }

    /// Returns the weight in kilograms, for display only.
    #[inline]
    pub fn kilograms(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} kg", self.kilograms())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99 €");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00 €");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50 €");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00 €");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-b).cents(), -500);

        let mut c = a;
        c -= b;
        assert_eq!(c.cents(), 500);
    }

    #[test]
    fn test_multiply_weight_exact() {
        // 10.00 €/kg × 2 kg = 20.00 €
        let price = Money::from_cents(1000);
        let qty = Weight::from_grams(2000);
        assert_eq!(price.multiply_weight(qty).cents(), 2000);
    }

    #[test]
    fn test_multiply_weight_rounds_half_up() {
        // 12.99 €/kg × 1.5 kg = 19.485 € → 19.49 €
        let price = Money::from_cents(1299);
        let qty = Weight::from_grams(1500);
        assert_eq!(price.multiply_weight(qty).cents(), 1949);

        // 3.33 €/kg × 0.1 kg = 0.333 € → 0.33 €
        let price = Money::from_cents(333);
        let qty = Weight::from_grams(100);
        assert_eq!(price.multiply_weight(qty).cents(), 33);
    }

    #[test]
    fn test_multiply_weight_small_cut() {
        // 45.50 €/kg × 0.085 kg (a single merguez) = 3.8675 € → 3.87 €
        let price = Money::from_cents(4550);
        let qty = Weight::from_grams(85);
        assert_eq!(price.multiply_weight(qty).cents(), 387);
    }

    #[test]
    fn test_weight_display() {
        assert_eq!(format!("{}", Weight::from_grams(1500)), "1.500 kg");
        assert_eq!(format!("{}", Weight::from_grams(85)), "0.085 kg");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert!(Weight::from_grams(1).is_positive());
        assert!(!Weight::from_grams(0).is_positive());
    }
}
