//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are kept as exact [`Decimal`] amounts; rounding only ever happens
//! when a price is formatted for display.
//!
//! # Display convention
//!
//! Amounts are shown the way the storefront's Spanish (Argentina) locale
//! writes them: a `$` prefix, `.` as the thousands separator, `,` as the
//! decimal separator, and no trailing fraction zeros.
//!
//! ```
//! use rust_decimal::Decimal;
//! use ticket_core::Price;
//!
//! assert_eq!(Price::new(Decimal::new(100, 0)).to_string(), "$100");
//! assert_eq!(Price::new(Decimal::new(12345, 1)).to_string(), "$1.234,5");
//! assert_eq!(Price::ZERO.to_string(), "$0");
//! ```

use core::fmt;
use core::iter::Sum;
use core::num::NonZeroU32;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of fraction digits kept when formatting for display.
const DISPLAY_DECIMALS: u32 = 2;

/// A unit or line price.
///
/// Serializes as a decimal string so the stored cart keeps every digit the
/// feed supplied. Deserializes from a number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: NonZeroU32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity.get())))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, price| Self(acc.0.saturating_add(price.0)))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.0))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::str::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self)
    }
}

/// Format an amount per the display convention.
fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let digits = rounded.abs().to_string();
    let (integer, fraction) = digits
        .split_once('.')
        .map_or((digits.as_str(), None), |(int, frac)| (int, Some(frac)));

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push('$');

    let len = integer.len();
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }

    out
}
