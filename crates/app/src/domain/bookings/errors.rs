//! Bookings service errors.

use jiff::civil::Date;
use lodge::{
    bookings::TransitionError,
    discounts::{DiscountError, Ineligibility},
    pricing::PriceError,
    refunds::RefundError,
    stays::StayError,
};
use thiserror::Error;

use crate::{errors::ErrorKind, store::StoreError};

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("invalid stay: {0}")]
    InvalidStay(#[from] StayError),

    #[error("check-in must be in the future")]
    CheckInNotInFuture,

    #[error("at least one guest is required")]
    NoGuests,

    #[error("payment id is required")]
    MissingPaymentId,

    #[error("invalid discount code: {0}")]
    InvalidDiscountCode(#[from] DiscountError),

    #[error("unable to price stay: {0}")]
    Pricing(#[from] PriceError),

    #[error("unable to compute refund: {0}")]
    Refund(#[from] RefundError),

    #[error("property not found")]
    PropertyNotFound,

    #[error("booking not found")]
    BookingNotFound,

    #[error("discount code not found")]
    DiscountNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("not authorized to access this booking")]
    Forbidden,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("booking was modified concurrently")]
    ConcurrentModification,

    #[error("property is not available for booking")]
    PropertyUnavailable,

    #[error("{0} is already booked")]
    DatesUnavailable(Date),

    #[error("discount code cannot be used: {0}")]
    DiscountIneligible(Ineligibility),

    #[error("invoice can only be generated for paid bookings")]
    NotPaid,

    #[error("booking cannot be completed before check-out")]
    StayNotOver,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl BookingsServiceError {
    /// Caller-visible category.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStay(_)
            | Self::CheckInNotInFuture
            | Self::NoGuests
            | Self::MissingPaymentId
            | Self::InvalidDiscountCode(_)
            | Self::Pricing(_)
            | Self::Refund(_) => ErrorKind::Validation,
            Self::PropertyNotFound
            | Self::BookingNotFound
            | Self::DiscountNotFound
            | Self::UserNotFound => ErrorKind::NotFound,
            Self::Forbidden => ErrorKind::Authorization,
            Self::Transition(_) | Self::ConcurrentModification => ErrorKind::Conflict,
            Self::PropertyUnavailable
            | Self::DatesUnavailable(_)
            | Self::DiscountIneligible(_)
            | Self::NotPaid
            | Self::StayNotOver => ErrorKind::DomainRule,
            Self::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<StoreError> for BookingsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AlreadyBooked { date } => Self::DatesUnavailable(date),
            StoreError::StaleWrite => Self::ConcurrentModification,
            other => Self::Storage(other),
        }
    }
}
