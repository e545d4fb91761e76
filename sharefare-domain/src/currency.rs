//! Conversion between decimal major-unit amounts and integer minor units.

use crate::model::Money;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

/// Largest supported number of decimal places; `10^18` still fits an `i64`.
pub const MAX_CURRENCY_SCALE: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AtomicUnitConversionError {
    #[error("amount has more decimal places than the currency allows")]
    NonIntegral,
    #[error("amount is out of range")]
    OutOfRange,
    #[error("currency scale {scale} is not supported (max {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
}

/// Number of decimal places of a currency's minor unit (2 for INR, 0 for JPY).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CurrencyScale(u32);

impl CurrencyScale {
    pub const CENTS: Self = Self(2);

    pub fn new(scale: u32) -> Result<Self, AtomicUnitConversionError> {
        if scale > MAX_CURRENCY_SCALE {
            return Err(AtomicUnitConversionError::UnsupportedScale {
                scale,
                max_supported: MAX_CURRENCY_SCALE,
            });
        }
        Ok(Self(scale))
    }

    pub fn scale(self) -> u32 {
        self.0
    }

    /// Converts a major-unit amount (`12.34`) into minor units (`1234`).
    pub fn to_minor_units(self, amount: Decimal) -> Result<Money, AtomicUnitConversionError> {
        let factor = Decimal::from_i128_with_scale(10_i128.pow(self.0), 0);
        let units = amount
            .checked_mul(factor)
            .ok_or(AtomicUnitConversionError::OutOfRange)?;
        if !units.fract().is_zero() {
            return Err(AtomicUnitConversionError::NonIntegral);
        }
        units
            .to_i64()
            .map(Money::from_i64)
            .ok_or(AtomicUnitConversionError::OutOfRange)
    }

    /// Converts minor units back into a major-unit decimal carrying this scale.
    pub fn to_decimal(self, amount: Money) -> Decimal {
        Decimal::new(amount.amount(), self.0)
    }
}

impl Default for CurrencyScale {
    fn default() -> Self {
        Self::CENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal")
    }

    #[rstest]
    #[case::cents("12.34", 2, Ok(1234))]
    #[case::trailing_zero("12.30", 2, Ok(1230))]
    #[case::whole_number("12", 2, Ok(1200))]
    #[case::yen("500", 0, Ok(500))]
    #[case::negative("-0.05", 2, Ok(-5))]
    #[case::too_precise("12.345", 2, Err(AtomicUnitConversionError::NonIntegral))]
    #[case::yen_fraction("0.5", 0, Err(AtomicUnitConversionError::NonIntegral))]
    #[case::overflow("100000000000000000000", 2, Err(AtomicUnitConversionError::OutOfRange))]
    fn to_minor_units_cases(
        #[case] input: &str,
        #[case] scale: u32,
        #[case] expected: Result<i64, AtomicUnitConversionError>,
    ) {
        let scale = CurrencyScale::new(scale).expect("supported scale");
        assert_eq!(
            scale.to_minor_units(dec(input)).map(Money::amount),
            expected
        );
    }

    #[test]
    fn rejects_unsupported_scale() {
        assert_eq!(
            CurrencyScale::new(MAX_CURRENCY_SCALE + 1),
            Err(AtomicUnitConversionError::UnsupportedScale {
                scale: MAX_CURRENCY_SCALE + 1,
                max_supported: MAX_CURRENCY_SCALE,
            })
        );
    }

    #[test]
    fn to_decimal_keeps_scale() {
        let decimal = CurrencyScale::CENTS.to_decimal(Money::from_i64(1200));
        assert_eq!(decimal.to_string(), "12.00");
        assert_eq!(
            CurrencyScale::CENTS.to_decimal(Money::from_i64(-5)).to_string(),
            "-0.05"
        );
    }
}
