//! Stays
//!
//! A stay covers the nights from check-in up to, but not including, the
//! check-out day.

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use thiserror::Error;

/// Errors raised while building a stay.
#[derive(Debug, Error)]
pub enum StayError {
    /// Check-out is on or before check-in.
    #[error("check-out must be after check-in")]
    CheckOutNotAfterCheckIn,

    /// The night count does not fit the supported range.
    #[error("stay length is out of range")]
    OutOfRange,

    /// Wrapped date arithmetic error.
    #[error(transparent)]
    Date(#[from] jiff::Error),
}

/// Check-in and check-out dates of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stay {
    check_in: Date,
    check_out: Date,
    nights: u32,
}

impl Stay {
    /// Build a stay, counting nights as the calendar-day difference.
    ///
    /// # Errors
    ///
    /// - [`StayError::CheckOutNotAfterCheckIn`]: `check_out <= check_in`.
    /// - [`StayError::OutOfRange`]: the night count does not fit a `u32`.
    /// - [`StayError::Date`]: the date difference could not be computed.
    pub fn new(check_in: Date, check_out: Date) -> Result<Self, StayError> {
        if check_out <= check_in {
            return Err(StayError::CheckOutNotAfterCheckIn);
        }

        let days = check_in.until(check_out)?.get_days();
        let nights = u32::try_from(days).ok().ok_or(StayError::OutOfRange)?;

        Ok(Self {
            check_in,
            check_out,
            nights,
        })
    }

    /// First night.
    pub fn check_in(&self) -> Date {
        self.check_in
    }

    /// Departure day; not itself a booked night.
    pub fn check_out(&self) -> Date {
        self.check_out
    }

    /// Number of nights.
    pub fn nights(&self) -> u32 {
        self.nights
    }

    /// Every booked night, from check-in up to the day before check-out.
    pub fn nights_iter(&self) -> impl Iterator<Item = Date> + use<> {
        let check_out = self.check_out;

        self.check_in
            .series(1.day())
            .take_while(move |night| *night < check_out)
    }

    /// Whether check-in starts strictly after `now`.
    ///
    /// # Errors
    ///
    /// Returns [`StayError::Date`] if the check-in day cannot be placed on the
    /// timeline.
    pub fn starts_after(&self, now: Timestamp) -> Result<bool, StayError> {
        Ok(start_of_day(self.check_in)? > now)
    }

    /// Whether the check-out day has begun at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`StayError::Date`] if the check-out day cannot be placed on the
    /// timeline.
    pub fn has_ended(&self, now: Timestamp) -> Result<bool, StayError> {
        Ok(start_of_day(self.check_out)? <= now)
    }
}

/// The first instant of `date` in UTC.
///
/// # Errors
///
/// Returns an error if the instant is outside the supported range.
pub fn start_of_day(date: Date) -> Result<Timestamp, jiff::Error> {
    Ok(date.at(0, 0, 0, 0).to_zoned(TimeZone::UTC)?.timestamp())
}
