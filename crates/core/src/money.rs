use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Kept at full precision; rounding happens only when formatting.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    fn to_cents(self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Two decimal places, no currency symbol: `1234.5` becomes `"1234.50"`.
    pub fn to_plain_string(self) -> String {
        format!("{:.2}", self.to_cents())
    }

    /// Two decimal places with thousands separators: `"$1,234.50"`.
    ///
    /// The sign follows the symbol (`"$-12.00"`), matching [`Display`](fmt::Display).
    pub fn to_grouped_string(self) -> String {
        let plain = self.to_plain_string();
        let (sign, digits) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("${sign}{grouped}.{frac_part}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.to_cents())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn formatting_rounds_half_away_from_zero() {
        assert_eq!(money("10.005").to_plain_string(), "10.01");
        assert_eq!(money("10.004").to_plain_string(), "10.00");
        assert_eq!(money("-10.005").to_plain_string(), "-10.01");
        assert_eq!(money("0.019").to_string(), "$0.02");
        assert_eq!(money("1234.565").to_grouped_string(), "$1,234.57");
    }

    #[test]
    fn sub_cent_amounts_are_summed_before_rounding() {
        let total: Money = [money("0.005"), money("0.005")].iter().sum();
        assert_eq!(total, money("0.01"));
        assert_eq!(total.to_grouped_string(), "$0.01");

        let total: Money = [money("0.004"), money("0.004"), money("0.004")].iter().sum();
        assert_eq!(total.to_plain_string(), "0.01");
    }

    #[test]
    fn display_has_symbol_and_two_places() {
        assert_eq!(Money::from_cents(24550).to_string(), "$245.50");
        assert_eq!(Money::from_cents(4000).to_string(), "$40.00");
        assert_eq!(Money::from_cents(-500).to_string(), "$-5.00");
    }

    #[test]
    fn plain_string_pads_whole_numbers() {
        let m = Money::from_decimal(Decimal::from(7));
        assert_eq!(m.to_plain_string(), "7.00");
    }

    #[test]
    fn grouped_inserts_thousands_separators() {
        assert_eq!(Money::from_cents(0).to_grouped_string(), "$0.00");
        assert_eq!(Money::from_cents(99_999).to_grouped_string(), "$999.99");
        assert_eq!(Money::from_cents(100_000).to_grouped_string(), "$1,000.00");
        assert_eq!(Money::from_cents(123_456_789).to_grouped_string(), "$1,234,567.89");
        assert_eq!(Money::from_cents(-123_456).to_grouped_string(), "$-1,234.56");
    }

    #[test]
    fn sum_is_exact() {
        // 0.1 + 0.2 style drift would show up here with floats.
        let parts = [Money::from_cents(10), Money::from_cents(20), Money::from_cents(-30)];
        let total: Money = parts.iter().sum();
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn add() {
        assert_eq!(Money::from_cents(1050) + Money::from_cents(50), Money::from_cents(1100));
    }
}
