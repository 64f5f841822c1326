//! Lodge prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    access::{Principal, Relationship, Role},
    bookings::{
        BookingStatus, CanceledBy, PaymentMethod, PaymentStatus, RefundStatus, TransitionError,
    },
    config::{ConfigError, PricingConfig},
    discounts::{
        AppliedDiscount, CodeName, DiscountCode, DiscountDescription, DiscountError, DiscountKind,
        DiscountValue, Ineligibility,
    },
    ids::{BookingId, PropertyId, TypedUuid, UserId},
    money::AmountError,
    pricing::{LineItem, PriceBreakdown, PriceCalculator, PriceError, PriceRequest},
    refunds::{Refund, RefundError, RefundTier, days_until_check_in, refund_for},
    stays::{Stay, StayError, start_of_day},
    taxes::TaxTable,
};
