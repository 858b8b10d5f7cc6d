//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A billing breakdown built on floats drifts: the reported total     │
//! │  stops matching the sum of its own components.                      │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Paise                                        │
//! │    Every amount is an i64 count of paise (1/100 rupee).             │
//! │    Derived amounts round half-up ONCE, at the paisa, so             │
//! │    total == discounted_subtotal + cgst + sgst holds exactly.        │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(14900); // ₹149.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // ₹298.00
//! let total = price + Money::from_paise(500);   // ₹154.00
//!
//! // NEVER from floats:
//! // let bad = Money::from_float(149.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest INR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// MenuItem.price_paise ──► LineItem.unit_price_paise ──► subtotal
///                                                           │
///                          BillingBreakdown ◄── discounts ◄─┘
///                          (every amount field is Money)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let price = Money::from_paise(14900); // Represents ₹149.00
    /// assert_eq!(price.paise(), 14900);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let price = Money::from_rupees(149);
    /// assert_eq!(price.paise(), 14900);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the rupee (major unit) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise (minor unit) portion, always 0-99.
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage rate and returns the resulting amount.
    ///
    /// This is the single rounding point for all derived amounts in the
    /// billing breakdown: GST components, percentage discounts, percentage
    /// offers. Rounds half-up at the paisa.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    /// i128 intermediate prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    /// use cafe_core::types::Rate;
    ///
    /// let base = Money::from_paise(100_000); // ₹1000.00
    /// let cgst = base.apply_rate(Rate::from_bps(250)); // 2.5%
    /// assert_eq!(cgst.paise(), 2500); // ₹25.00
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let amount = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(amount as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(12000); // ₹120.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paise(), 36000); // ₹360.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The admin frontend formats amounts
/// itself to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
        )
    }
}

/// Default money is zero.
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

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(14999);
        assert_eq!(money.paise(), 14999);
        assert_eq!(money.rupees(), 149);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(149).paise(), 14900);
        assert_eq!(Money::from_rupees(-5).paise(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(14999)), "₹149.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_apply_rate_basic() {
        // ₹1000.00 at 2.5% = ₹25.00
        let amount = Money::from_paise(100_000);
        let rate = Rate::from_bps(250);
        assert_eq!(amount.apply_rate(rate).paise(), 2500);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // ₹10.01 at 2.5% = 25.025 paise → 25 paise
        assert_eq!(
            Money::from_paise(1001).apply_rate(Rate::from_bps(250)).paise(),
            25
        );
        // ₹10.00 at 8.25% = 82.5 paise → 83 paise
        assert_eq!(
            Money::from_paise(1000).apply_rate(Rate::from_bps(825)).paise(),
            83
        );
    }

    #[test]
    fn test_apply_rate_full_and_zero() {
        let amount = Money::from_paise(12345);
        assert_eq!(amount.apply_rate(Rate::from_bps(10000)), amount);
        assert!(amount.apply_rate(Rate::zero()).is_zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_paise(100);
        assert!(positive.is_positive());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().paise(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(12000);
        assert_eq!(unit_price.multiply_quantity(3).paise(), 36000);
    }

    /// Ordering is derived from the raw paise value; the billing calculator
    /// relies on it for the discount clamp and the zero floor.
    #[test]
    fn test_ordering() {
        let a = Money::from_paise(100);
        let b = Money::from_paise(50);
        assert_eq!(a.min(b), b);
        assert_eq!((b - a).max(Money::zero()), Money::zero());
    }
}
