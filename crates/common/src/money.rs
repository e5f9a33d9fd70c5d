//! Fixed-point money amounts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MICROS_PER_UNIT: i64 = 1_000_000;
const MICROS_PER_CENT: i64 = 10_000;

/// Money amount held in millionths of a currency unit.
///
/// The storefront API exchanges prices as decimal numbers (`0.333`), so unit
/// prices keep sub-cent precision. Totals are rounded to whole cents with
/// [`Money::rounded`]; [`Money::cents`] and `Display` round the same way.
/// Arithmetic saturates at the `i64` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    micros: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self {
            micros: cents.saturating_mul(MICROS_PER_CENT),
        }
    }

    /// Creates a Money amount from a decimal value, keeping six fractional
    /// digits. Non-finite values become zero; out-of-range values saturate.
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self {
            micros: (amount * MICROS_PER_UNIT as f64).round() as i64,
        }
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { micros: 0 }
    }

    /// Returns the amount in whole cents, rounding half away from zero.
    pub fn cents(&self) -> i64 {
        let whole = self.micros / MICROS_PER_CENT;
        let rest = (self.micros % MICROS_PER_CENT).unsigned_abs();
        if rest >= (MICROS_PER_CENT / 2).unsigned_abs() {
            whole.saturating_add(self.micros.signum())
        } else {
            whole
        }
    }

    /// Returns the amount rounded to whole cents.
    pub fn rounded(&self) -> Money {
        Money::from_cents(self.cents())
    }

    /// Returns the amount as a decimal number.
    pub fn as_decimal(&self) -> f64 {
        self.micros as f64 / MICROS_PER_UNIT as f64
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.micros == 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            micros: self.micros.saturating_mul(i64::from(quantity)),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            micros: self.micros.saturating_add(rhs.micros),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            micros: self.micros.saturating_sub(rhs.micros),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.micros = self.micros.saturating_add(rhs.micros);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, amount| acc + amount)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::de::decimal(deserializer).map(Money::from_decimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(Money::from_decimal(12.345).cents(), 1235);
        assert_eq!(Money::from_decimal(99.9).cents(), 9990);
        assert_eq!(Money::from_decimal(-0.005).cents(), -1);
        assert_eq!(Money::from_decimal(f64::NAN), Money::zero());
    }

    #[test]
    fn display() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert_eq!(a.multiply(3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 1500);
    }

    #[test]
    fn wire_format_is_a_decimal_number() {
        let money: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(money.cents(), 1999);
        assert_eq!(serde_json::to_string(&money).unwrap(), "19.99");

        let from_string: Money = serde_json::from_str("\"250\"").unwrap();
        assert_eq!(from_string.cents(), 25000);

        let missing: Money = serde_json::from_str("null").unwrap();
        assert!(missing.is_zero());
    }

    #[test]
    fn sub_cent_amounts_survive_decoding() {
        let price: Money = serde_json::from_str("0.333").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "0.333");
        assert_eq!(price.cents(), 33);

        let line = price.multiply(3);
        assert_eq!(line.cents(), 100);
        assert_eq!(line.rounded(), Money::from_cents(100));
        assert_eq!(line.to_string(), "$1.00");
    }

    #[test]
    fn arithmetic_saturates() {
        let huge = Money::from_decimal(1e17);
        assert_eq!(huge, Money::from_decimal(f64::MAX));

        let sum = huge + huge;
        assert_eq!(sum, huge);
        assert!(sum.cents() > 0);

        let mut acc = huge;
        acc += huge;
        assert_eq!(acc, huge);

        let low = Money::from_decimal(-1e17);
        assert_eq!(low - huge, low);
        assert_eq!(Money::from_cents(i64::MAX).multiply(2), Money::from_cents(i64::MAX));
    }
}
