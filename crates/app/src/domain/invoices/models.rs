//! Invoice Models

use jiff::{Timestamp, civil::Date};
use lodge::{
    bookings::{PaymentMethod, PaymentStatus},
    ids::BookingId,
    pricing::LineItem,
};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

/// Everything printed on an invoice, denormalised from the booking, its
/// property and its guest.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceData {
    pub invoice_number: String,
    pub issued_at: Timestamp,
    pub customer: InvoiceCustomer,
    pub property: InvoiceProperty,
    pub stay: InvoiceStay,
    pub line_items: SmallVec<[LineItem; 8]>,
    pub total: Money<'static, Currency>,
    pub payment: InvoicePayment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceProperty {
    pub title: String,
    pub location: String,
    pub host_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceStay {
    pub booking: BookingId,
    pub check_in: Date,
    pub check_out: Date,
    pub nights: u32,
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayment {
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub id: Option<String>,
}
