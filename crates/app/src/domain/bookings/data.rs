//! Booking Data

use jiff::civil::Date;
use lodge::{
    bookings::PaymentMethod,
    ids::{PropertyId, UserId},
};

/// New Booking Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub property: PropertyId,
    pub check_in: Date,
    pub check_out: Date,
    pub guests: u32,
    pub discount_code: Option<String>,
    pub message: Option<String>,
    pub special_requests: Option<String>,
}

impl NewBooking {
    pub fn new(property: PropertyId, check_in: Date, check_out: Date, guests: u32) -> Self {
        Self {
            property,
            check_in,
            check_out,
            guests,
            discount_code: None,
            message: None,
            special_requests: None,
        }
    }

    #[must_use]
    pub fn with_discount_code(mut self, code: impl Into<String>) -> Self {
        self.discount_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Quote Request Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub property: PropertyId,
    pub check_in: Date,
    pub check_out: Date,
    pub discount_code: Option<String>,
}

impl From<&NewBooking> for QuoteRequest {
    fn from(booking: &NewBooking) -> Self {
        Self {
            property: booking.property,
            check_in: booking.check_in,
            check_out: booking.check_out,
            discount_code: booking.discount_code.clone(),
        }
    }
}

/// Payment Data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentDetails {
    /// Provider payment id; required.
    pub id: String,
    pub method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub last4_digits: Option<String>,
}

impl PaymentDetails {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }
}

/// Which bookings a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingScope {
    /// Every booking.
    All,

    /// Bookings made by one guest.
    Guest(UserId),

    /// Bookings on any of the given properties.
    Properties(Vec<PropertyId>),
}
