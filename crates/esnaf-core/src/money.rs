//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A customer balance is a running sum over every sale and payment   │
//! │  ever recorded. Accumulated float error would break the ledger's   │
//! │  core invariant (balance == Σ order totals).                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Kuruş                                        │
//! │    ₺125,50 is stored as 12550. Sums are exact. Only display        │
//! │    formatting ever converts to lira-and-kuruş notation.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use esnaf_core::money::Money;
//!
//! // Create from kuruş (preferred)
//! let total = Money::from_kurus(12550); // ₺125,50
//!
//! // Signed: payments are negative order totals
//! let payment = -total;
//! assert_eq!((total + payment).kurus(), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (kuruş for TRY).
///
/// ## Design Decisions
/// - **i64 (signed)**: positive = sale / debt increase, negative = payment /
///   debt decrease; customer balances go either way
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serialized as a plain integer, which is also the
///   stored representation (display locale is presentation-only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kuruş (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use esnaf_core::money::Money;
    ///
    /// let total = Money::from_kurus(12550); // ₺125,50
    /// assert_eq!(total.kurus(), 12550);
    /// ```
    #[inline]
    pub const fn from_kurus(kurus: i64) -> Self {
        Money(kurus)
    }

    /// Creates a Money value from major and minor units (lira and kuruş).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_lira_kurus(-5, 50)` = -₺5,50, not -₺4,50.
    #[inline]
    pub const fn from_lira_kurus(lira: i64, kurus: i64) -> Self {
        if lira < 0 {
            Money(lira * 100 - kurus)
        } else {
            Money(lira * 100 + kurus)
        }
    }

    /// Returns the value in kuruş (smallest currency unit).
    #[inline]
    pub const fn kurus(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (lira) portion.
    #[inline]
    pub const fn lira(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn kurus_part(&self) -> i64 {
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
    ///
    /// The cashbox sums `|total|` over cash orders, so a -₺125,50 payment
    /// contributes ₺125,50 of drawer cash.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation renders Turkish-lira notation: `₺1.234,56`.
///
/// ## Note
/// Presentation-only. The stored representation stays plain integer kuruş.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₺{},{:02}",
            sign,
            group_thousands(self.lira().abs()),
            self.kurus_part()
        )
    }
}

/// Inserts `.` thousands separators: 1234567 -> "1.234.567".
fn group_thousands(mut n: i64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push((n % 1000) as u16);
        n /= 1000;
    }
    let mut out = groups.pop().map(|g| g.to_string()).unwrap_or_default();
    while let Some(g) = groups.pop() {
        out.push_str(&format!(".{:03}", g));
    }
    out
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

/// Negation: `addPayment` stores `-total` on the order.
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over order totals (the balance invariant is a `Sum`).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kurus() {
        let money = Money::from_kurus(12550);
        assert_eq!(money.kurus(), 12550);
        assert_eq!(money.lira(), 125);
        assert_eq!(money.kurus_part(), 50);
    }

    #[test]
    fn test_from_lira_kurus() {
        let money = Money::from_lira_kurus(125, 50);
        assert_eq!(money.kurus(), 12550);

        let negative = Money::from_lira_kurus(-5, 50);
        assert_eq!(negative.kurus(), -550);
    }

    #[test]
    fn test_display_turkish_locale() {
        assert_eq!(format!("{}", Money::from_kurus(12550)), "₺125,50");
        assert_eq!(format!("{}", Money::from_kurus(500)), "₺5,00");
        assert_eq!(format!("{}", Money::from_kurus(-550)), "-₺5,50");
        assert_eq!(format!("{}", Money::from_kurus(0)), "₺0,00");
        assert_eq!(format!("{}", Money::from_kurus(123456789)), "₺1.234.567,89");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_kurus(1000);
        let b = Money::from_kurus(500);

        assert_eq!((a + b).kurus(), 1500);
        assert_eq!((a - b).kurus(), 500);
        assert_eq!((-a).kurus(), -1000);
        assert_eq!((a * 3).kurus(), 3000);
    }

    #[test]
    fn test_sum() {
        let totals = [
            Money::from_kurus(12550),
            Money::from_kurus(-12550),
            Money::from_kurus(8875),
        ];
        let balance: Money = totals.iter().copied().sum();
        assert_eq!(balance.kurus(), 8875);
    }

    #[test]
    fn test_abs_for_cashbox() {
        // A payment is a negative order total but positive drawer cash
        let payment = Money::from_kurus(-12550);
        assert_eq!(payment.abs().kurus(), 12550);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_kurus(100).is_positive());
        assert!(Money::from_kurus(-100).is_negative());
    }

    #[test]
    fn test_serde_transparent() {
        let money = Money::from_kurus(12550);
        assert_eq!(serde_json::to_string(&money).unwrap(), "12550");
        let back: Money = serde_json::from_str("12550").unwrap();
        assert_eq!(back, money);
    }
}
