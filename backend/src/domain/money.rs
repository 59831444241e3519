//! Exact decimal money values.
//!
//! Money is `rust_decimal::Decimal` end to end; binary floating point never
//! touches a balance. Storage columns are `NUMERIC(20,2)`, so amounts with
//! more than two fractional digits are rejected instead of being rounded
//! silently by the database.

use rust_decimal::Decimal;

/// Number of fractional digits money values may carry.
pub const MONEY_SCALE: u32 = 2;

/// Largest value a `NUMERIC(20,2)` money column holds: `999999999999999999.99`.
#[must_use]
pub fn max_money() -> Decimal {
    Decimal::from_i128_with_scale(99_999_999_999_999_999_999, MONEY_SCALE)
}

/// `value` carried at exactly [`MONEY_SCALE`] fractional digits, so `100`
/// and `100.0` both render as `100.00`.
#[must_use]
pub fn at_money_scale(value: Decimal) -> Decimal {
    let mut scaled = value;
    scaled.rescale(MONEY_SCALE);
    scaled
}

/// Validation errors for monetary input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountValidationError {
    /// Zero or negative amount.
    #[error("amount must be greater than zero")]
    NotPositive,
    /// More than [`MONEY_SCALE`] fractional digits.
    #[error("amount must have at most 2 decimal places")]
    TooPrecise,
    /// Above [`max_money`].
    #[error("amount must not exceed 999999999999999999.99")]
    TooLarge,
}

/// Strictly positive money amount with at most two decimal places.
///
/// # Examples
/// ```
/// use banking_backend::domain::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::new(Decimal::new(5000, 2)).unwrap();
/// assert_eq!(amount.value().to_string(), "50.00");
/// assert!(Amount::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Validate and wrap a decimal amount.
    pub fn new(value: Decimal) -> Result<Self, AmountValidationError> {
        if value <= Decimal::ZERO {
            return Err(AmountValidationError::NotPositive);
        }
        let normalised = value.normalize();
        if normalised.scale() > MONEY_SCALE {
            return Err(AmountValidationError::TooPrecise);
        }
        if value > max_money() {
            return Err(AmountValidationError::TooLarge);
        }
        Ok(Self(value))
    }

    /// Underlying decimal value.
    pub fn value(self) -> Decimal {
        self.0
    }
}
