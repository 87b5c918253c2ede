//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `Rate` type for percentages (tax, discounts) in basis points.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The legacy offer tool computed totals in JS floats:                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    €650.00 is 65000 cents. Sums, discounts and VAT are exact            │
//! │    integer math; rounding happens in exactly one place (Rate::apply).   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use offerdesk_core::money::{Money, Rate};
//!
//! let price = Money::from_cents(65000); // €650.00
//! let vat = Rate::from_bps(2400);       // 24%
//!
//! assert_eq!(vat.apply(price).cents(), 15600);
//! ```
//!
//! Currency is a display tag carried alongside an offer; it never affects
//! arithmetic and there is no conversion between currencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: lets intermediate math (e.g. discount clamping) go
///   through zero without surprises; validation keeps stored prices >= 0
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for the JSON offer contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    ///
    /// let price = Money::from_cents(50000); // €500.00
    /// assert_eq!(price.cents(), 50000);
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

    /// Returns the major unit portion (euros, dollars, ...).
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

    /// Checks if the value is zero.
    ///
    /// A zero catalog price is the custom-price sentinel (see the catalog
    /// module), so this check carries business meaning beyond arithmetic.
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

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(5000); // €50.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 15000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Clamps the value into `[lo, hi]`.
    ///
    /// Used by the totals aggregator to enforce the discount invariant
    /// `0 <= discount <= subtotal`.
    pub fn clamp(self, lo: Money, hi: Money) -> Money {
        Money(self.0.clamp(lo.0, hi.0))
    }
}

// =============================================================================
// Rate Type
// =============================================================================

/// A percentage expressed in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2400 bps = 24% (e.g., Greek VAT)
///
/// Operators type percentages like `24` or `8.5`; we store them as integer
/// bps so the percentage survives serialization without float drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience at the edges).
    pub fn from_percent(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Applies the rate to an amount, returning the rounded portion.
    ///
    /// ## Implementation
    /// Integer math with an i128 intermediate to prevent overflow:
    /// `(amount * bps + 5000) / 10000` (the +5000 rounds half up).
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::{Money, Rate};
    ///
    /// let taxable = Money::from_cents(60000); // €600.00
    /// let vat = Rate::from_bps(2400);         // 24%
    /// assert_eq!(vat.apply(taxable).cents(), 14400); // €144.00
    /// ```
    pub fn apply(&self, amount: Money) -> Money {
        let portion = (amount.cents() as i128 * self.0 as i128 + 5000) / 10000;
        Money::from_cents(portion as i64)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money with two decimals.
///
/// ## Note
/// This is for debugging and logs. The frontend formats amounts with the
/// offer's currency tag and locale; we never format currency symbols here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
