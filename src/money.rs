//! Money helpers
//!
//! All amounts are rounded to the currency's minor unit, half away from zero,
//! at the point they are produced.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised by money arithmetic helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// A multiplication or addition left the representable decimal range.
    #[error("monetary arithmetic overflowed")]
    Overflow,

    /// Two amounts in different currencies were combined.
    #[error("currency mismatch: expected {expected}, found {actual}")]
    CurrencyMismatch {
        /// Currency the calculation was running in.
        expected: &'static str,

        /// Currency of the offending amount.
        actual: &'static str,
    },
}

/// Round a decimal to the number of minor-unit digits of `currency`.
pub fn round_to_minor(amount: Decimal, currency: &Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Build a money value, rounding the amount to the currency's minor unit first.
pub fn rounded<'a>(amount: Decimal, currency: &'a Currency) -> Money<'a, Currency> {
    Money::from_decimal(round_to_minor(amount, currency), currency)
}

/// Multiply an amount by a ratio (for example `0.15`) and round the result.
///
/// # Errors
///
/// Returns [`AmountError::Overflow`] if the product is not representable.
pub fn apply_rate<'a>(
    amount: &Money<'a, Currency>,
    rate: Decimal,
) -> Result<Money<'a, Currency>, AmountError> {
    let product = amount
        .amount()
        .checked_mul(rate)
        .ok_or(AmountError::Overflow)?;

    Ok(rounded(product, amount.currency()))
}

/// Add a list of same-currency amounts.
///
/// # Errors
///
/// - [`AmountError::CurrencyMismatch`]: an amount is not in `currency`.
/// - [`AmountError::Overflow`]: the sum is not representable.
pub fn sum<'a>(
    currency: &'a Currency,
    amounts: &[&Money<'a, Currency>],
) -> Result<Money<'a, Currency>, AmountError> {
    let total = amounts.iter().try_fold(Decimal::ZERO, |acc, amount| {
        ensure_currency(currency, amount)?;

        acc.checked_add(*amount.amount()).ok_or(AmountError::Overflow)
    })?;

    Ok(rounded(total, currency))
}

/// Return an error if `amount` is not denominated in `currency`.
///
/// # Errors
///
/// Returns [`AmountError::CurrencyMismatch`] when the ISO codes differ.
pub fn ensure_currency(
    currency: &Currency,
    amount: &Money<'_, Currency>,
) -> Result<(), AmountError> {
    let actual = amount.currency().iso_alpha_code;

    if actual == currency.iso_alpha_code {
        Ok(())
    } else {
        Err(AmountError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            actual,
        })
    }
}

/// Zero in the given currency.
pub fn zero(currency: &Currency) -> Money<'_, Currency> {
    Money::from_minor(0, currency)
}
