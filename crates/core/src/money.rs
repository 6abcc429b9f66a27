//! Money in the smallest currency unit.
//!
//! The catalog publishes prices as decimals (`109.95`). Totals are summed in
//! cents so that repeated additions never drift.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Non-negative amount in cents.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Parse a plain decimal literal (`"25.5"`, `"109.95"`, `"10"`) exactly.
    ///
    /// Amounts that are not a whole number of cents are rejected rather than
    /// rounded; trailing zeros past the second fractional digit are accepted.
    pub fn parse_decimal(text: &str) -> DomainResult<Self> {
        let text = text.trim();
        if text.starts_with('-') {
            return Err(DomainError::validation(format!("amount must be non-negative: {text}")));
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
            return Err(DomainError::validation(format!("not a plain decimal amount: {text}")));
        }

        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > 2 {
            return Err(DomainError::validation(format!(
                "amount has sub-cent precision: {text}"
            )));
        }

        let out_of_range = || DomainError::validation(format!("amount out of range: {text}"));
        let whole: u64 = whole.parse().map_err(|_| out_of_range())?;
        let cents: u64 = format!("{fraction:0<2}").parse().map_err(|_| out_of_range())?;

        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .map(Self)
            .ok_or_else(out_of_range)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    pub fn saturating_add(self, other: Money) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_decimal_reads_whole_cents() {
        assert_eq!(Money::parse_decimal("25.5").unwrap().cents(), 2550);
        assert_eq!(Money::parse_decimal("109.95").unwrap().cents(), 10995);
        assert_eq!(Money::parse_decimal("64").unwrap().cents(), 6400);
        assert_eq!(Money::parse_decimal("10.500").unwrap().cents(), 1050);
        assert_eq!(Money::parse_decimal("0.0").unwrap(), Money::ZERO);
    }

    #[test]
    fn parse_decimal_rejects_sub_cent_amounts() {
        for text in ["0.004", "0.125", "1.005"] {
            match Money::parse_decimal(text) {
                Err(DomainError::Validation(msg)) => assert!(msg.contains("sub-cent"), "{text}: {msg}"),
                other => panic!("Expected sub-cent validation error for {text}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_decimal_rejects_negative_and_malformed_input() {
        assert!(matches!(Money::parse_decimal("-0.01"), Err(DomainError::Validation(_))));
        assert!(matches!(Money::parse_decimal("1e3"), Err(DomainError::Validation(_))));
        assert!(matches!(Money::parse_decimal(".5"), Err(DomainError::Validation(_))));
        assert!(matches!(Money::parse_decimal("NaN"), Err(DomainError::Validation(_))));
        assert!(matches!(
            Money::parse_decimal("99999999999999999999"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn display_pads_cents() {
        assert_eq!(Money::from_cents(4550).to_string(), "45.50");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn sum_adds_line_totals() {
        let total: Money = [Money::from_cents(1000).times(2), Money::from_cents(2550)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 4550);
        assert_eq!(total.to_decimal(), 45.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any literal with at most two fractional digits parses to
        /// exactly `whole * 100 + fraction` cents.
        #[test]
        fn two_digit_literals_parse_exactly(whole in 0u64..1_000_000u64, fraction in 0u64..100u64) {
            let text = format!("{whole}.{fraction:02}");
            prop_assert_eq!(Money::parse_decimal(&text).unwrap().cents(), whole * 100 + fraction);
        }
    }
}
