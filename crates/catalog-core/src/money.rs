//! # Money Module
//!
//! Provides the `Money` type for handling prices and basket totals exactly.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Basket totals sum price × quantity over many lines, so the error      │
//! │  compounds with every item priced.                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents)                              │
//! │    "2.00" → 200,  200 × 3 = 600 → "6.00"   exact, always               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//!
//! let price: Money = "2.00".parse().unwrap();
//! let total = price * 3;
//! assert_eq!(total.to_string(), "6.00");
//!
//! // There is no float constructor on purpose.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of minor units in one major unit.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values exist only transiently (they are
///   rejected by validation before any write)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Text on the wire**: serde and the flat-file store use `"2.00"`,
///   the SQLite store keeps the raw integer so SQL comparisons stay exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Checked multiplication, `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Checked addition, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses exact decimal text: `"2"`, `"2.5"`, `"2.00"`, `"-0.75"`.
///
/// ## Rules
/// - Optional leading sign
/// - At least one integer digit
/// - At most two fractional digits (anything finer is not representable
///   exactly and is rejected instead of rounded)
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let text = s.trim();
        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (major_text, minor_text) = match unsigned.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (unsigned, ""),
        };

        if major_text.is_empty() || !major_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a decimal number such as 2.50"));
        }
        if unsigned.contains('.') && minor_text.is_empty() {
            return Err(invalid("missing digits after the decimal point"));
        }
        if minor_text.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }
        if !minor_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a decimal number such as 2.50"));
        }

        let major: i64 = major_text
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_text.len() {
            0 => 0,
            1 => minor_text.parse::<i64>().unwrap_or(0) * 10,
            _ => minor_text.parse::<i64>().unwrap_or(0),
        };

        let cents = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl TryFrom<String> for Money {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal with two fractional digits, no currency symbol.
/// This is also the persisted text form of the flat-file store.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn test_parse_accepts_exact_decimals() {
        assert_eq!("2".parse::<Money>().unwrap().cents(), 200);
        assert_eq!("2.5".parse::<Money>().unwrap().cents(), 250);
        assert_eq!("2.00".parse::<Money>().unwrap().cents(), 200);
        assert_eq!(" 0.07 ".parse::<Money>().unwrap().cents(), 7);
        assert_eq!("-0.75".parse::<Money>().unwrap().cents(), -75);
        assert_eq!("+1.10".parse::<Money>().unwrap().cents(), 110);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "".parse::<Money>(),
            Err(ValidationError::Required { .. })
        ));
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1.".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_display_parse_agree() {
        for cents in [0, 1, 10, 99, 100, 1099, 123456] {
            let money = Money::from_cents(cents);
            assert_eq!(money.to_string().parse::<Money>().unwrap(), money);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    /// 0.10 + 0.20 is exactly 0.30, unlike binary floats.
    #[test]
    fn test_no_float_drift() {
        let a: Money = "0.10".parse().unwrap();
        let b: Money = "0.20".parse().unwrap();
        assert_eq!((a + b).to_string(), "0.30");
    }

    #[test]
    fn test_checked_multiply_quantity() {
        assert_eq!(
            Money::from_cents(299).checked_multiply_quantity(3),
            Some(Money::from_cents(897))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(
            Money::from_cents(150).checked_add(Money::from_cents(50)),
            Some(Money::from_cents(200))
        );
        let half = Money::from_cents(5_000_000_000_000_000_000);
        assert_eq!(half.checked_add(half), None);
    }

    #[test]
    fn test_serde_uses_decimal_text() {
        let json = serde_json::to_string(&Money::from_cents(600)).unwrap();
        assert_eq!(json, "\"6.00\"");

        let back: Money = serde_json::from_str("\"2.5\"").unwrap();
        assert_eq!(back.cents(), 250);

        assert!(serde_json::from_str::<Money>("\"2.555\"").is_err());
    }
}
