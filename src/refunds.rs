//! Cancellation refunds
//!
//! The refund is a fraction of the booking total chosen by how many whole days
//! remain until check-in. Boundaries are exclusive: exactly 7 days out falls to
//! the 50% tier and exactly 3 days out to no refund.

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    money::{AmountError, apply_rate},
    stays::start_of_day,
};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Errors raised while computing a refund.
#[derive(Debug, Error)]
pub enum RefundError {
    /// The check-in day could not be placed on the timeline.
    #[error(transparent)]
    Date(#[from] jiff::Error),

    /// Wrapped arithmetic error.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Refund tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundTier {
    /// More than 7 days before check-in.
    Full,

    /// More than 3 and at most 7 days before check-in.
    Half,

    /// 3 days or fewer before check-in.
    None,
}

impl RefundTier {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::None => "none",
        }
    }

    /// Tier for a number of whole days until check-in.
    pub fn for_days(days_until_check_in: i64) -> Self {
        if days_until_check_in > 7 {
            Self::Full
        } else if days_until_check_in > 3 {
            Self::Half
        } else {
            Self::None
        }
    }

    /// Fraction of the total that is refunded.
    pub fn fraction(self) -> Decimal {
        match self {
            Self::Full => Decimal::ONE,
            Self::Half => Decimal::new(5, 1),
            Self::None => Decimal::ZERO,
        }
    }

    /// Refund owed on `total` under this tier, rounded to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the product is not representable.
    pub fn refund_of<'a>(
        self,
        total: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, AmountError> {
        apply_rate(total, self.fraction())
    }
}

/// Whole days from `now` until the start of `check_in` (UTC), rounded up.
///
/// Negative once check-in has passed.
///
/// # Errors
///
/// Returns an error if the check-in day cannot be placed on the timeline.
pub fn days_until_check_in(now: Timestamp, check_in: Date) -> Result<i64, jiff::Error> {
    let millis = start_of_day(check_in)?.as_millisecond() - now.as_millisecond();

    Ok(millis / MILLIS_PER_DAY + i64::from(millis % MILLIS_PER_DAY > 0))
}

/// Outcome of applying the refund rule to a cancellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refund<'a> {
    /// Whole days until check-in at cancellation time.
    pub days_until_check_in: i64,

    /// Selected tier.
    pub tier: RefundTier,

    /// Amount owed back to the guest.
    pub amount: Money<'a, Currency>,
}

/// Compute the refund for cancelling a booking worth `total` at `now`.
///
/// # Errors
///
/// Returns [`RefundError`] if the check-in date or the amount cannot be
/// computed.
pub fn refund_for<'a>(
    now: Timestamp,
    check_in: Date,
    total: &Money<'a, Currency>,
) -> Result<Refund<'a>, RefundError> {
    let days = days_until_check_in(now, check_in)?;
    let tier = RefundTier::for_days(days);

    Ok(Refund {
        days_until_check_in: days,
        tier,
        amount: tier.refund_of(total)?,
    })
}
