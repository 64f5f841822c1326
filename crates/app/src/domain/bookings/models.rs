//! Booking Models

use jiff::Timestamp;
use lodge::{
    bookings::{BookingStatus, CanceledBy, PaymentMethod, PaymentStatus, RefundStatus},
    ids::{BookingId, PropertyId, UserId},
    pricing::PriceBreakdown,
    refunds::RefundTier,
    stays::Stay,
};
use rusty_money::{Money, iso::Currency};

/// Booking Model
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub property: PropertyId,
    pub guest: UserId,
    pub stay: Stay,
    pub guests: u32,
    /// Price snapshot taken at creation.
    pub price: PriceBreakdown<'static>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment: Option<PaymentInfo>,
    pub invoice_number: Option<String>,
    pub message: Option<String>,
    pub special_requests: Option<String>,
    pub cancellation: Option<Cancellation>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn total(&self) -> Money<'static, Currency> {
        self.price.total()
    }

    pub fn refund_amount(&self) -> Option<Money<'static, Currency>> {
        self.cancellation.as_ref().map(|cancellation| cancellation.refund_amount)
    }
}

/// Payment Info Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub id: String,
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub last4_digits: Option<String>,
    pub paid_at: Timestamp,
}

/// Cancellation Model
#[derive(Debug, Clone, PartialEq)]
pub struct Cancellation {
    pub canceled_by: CanceledBy,
    pub reason: Option<String>,
    pub days_until_check_in: i64,
    pub refund_tier: RefundTier,
    pub refund_amount: Money<'static, Currency>,
    /// Present when money is owed back for a completed payment.
    pub refund_status: Option<RefundStatus>,
    pub canceled_at: Timestamp,
}
