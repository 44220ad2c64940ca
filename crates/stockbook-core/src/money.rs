//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sale of $150.00 with $50.00 on credit must split into exactly       │
//! │  $100.00 cash + $50.00 due, every time.                                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    15000 cents − 5000 cents = 10000 cents (exact)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::money::Money;
//!
//! let price = Money::from_cents(500); // $5.00
//! let line_total = price.multiply_quantity(30);
//! assert_eq!(line_total.cents(), 15000);
//! assert_eq!(line_total.to_string(), "$150.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: profit/loss can be negative
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.buying_price ──► buying cost   (delivered × buying price)     │
/// │  Product.selling_price ─► sales value   (sold × selling price)         │
/// │  SalesItem.selling_price ─► item total ─► sale total ─► cash / due     │
/// │  DueEntry.due_amount ───► seller due totals                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollars portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// Used for derived report values. Stored amounts go through
    /// [`Money::checked_multiply_quantity`].
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity; `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(500).checked_multiply_quantity(3), Some(Money::from_cents(1500)));
    /// assert_eq!(Money::from_cents(2).checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts; `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Divides by a quantity, rounding half away from zero to the nearest cent.
    ///
    /// Used for average unit prices. A zero quantity yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// // $10.00 over 3 units = $3.333.. → $3.33
    /// assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
    /// // $10.00 over 6 units = $1.666.. → $1.67
    /// assert_eq!(Money::from_cents(1000).divide_rounded(6).cents(), 167);
    /// assert_eq!(Money::from_cents(1000).divide_rounded(0).cents(), 0);
    /// ```
    pub fn divide_rounded(&self, qty: i64) -> Money {
        if qty == 0 {
            return Money::zero();
        }
        let num = self.0 as i128;
        let den = qty as i128;
        let half = den.abs() / 2;
        let rounded = if (num >= 0) == (den > 0) {
            (num.abs() + half) / den.abs()
        } else {
            -((num.abs() + half) / den.abs())
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34` (for logs and error messages).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Saturating multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
