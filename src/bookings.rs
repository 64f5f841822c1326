//! Booking lifecycle
//!
//! ```text
//! Pending --pay--> Confirmed --stay ends--> Completed
//!    \                 |
//!     `---cancel---> Canceled
//! ```
//!
//! Canceled and Completed are terminal.

use std::fmt;

use thiserror::Error;

/// Illegal lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The booking was already canceled.
    #[error("booking is already canceled")]
    AlreadyCanceled,

    /// The booking was already completed.
    #[error("booking is already completed")]
    AlreadyCompleted,

    /// Payment can only be confirmed while the booking is pending.
    #[error("booking is {0}, expected pending")]
    NotPending(BookingStatus),

    /// Completion needs a confirmed booking.
    #[error("booking is {0}, expected confirmed")]
    NotConfirmed(BookingStatus),
}

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookingStatus {
    /// Created, awaiting payment.
    #[default]
    Pending,

    /// Paid.
    Confirmed,

    /// Canceled by the guest, host or an administrator.
    Canceled,

    /// The stay is over.
    Completed,
}

impl BookingStatus {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }

    /// Whether a cancel request may proceed.
    ///
    /// # Errors
    ///
    /// Fails for terminal statuses.
    pub const fn ensure_cancellable(self) -> Result<(), TransitionError> {
        match self {
            Self::Canceled => Err(TransitionError::AlreadyCanceled),
            Self::Completed => Err(TransitionError::AlreadyCompleted),
            Self::Pending | Self::Confirmed => Ok(()),
        }
    }

    /// Whether payment may be confirmed.
    ///
    /// # Errors
    ///
    /// Fails unless the booking is pending.
    pub const fn ensure_payable(self) -> Result<(), TransitionError> {
        match self {
            Self::Pending => Ok(()),
            other => Err(TransitionError::NotPending(other)),
        }
    }

    /// Whether the booking may be marked completed.
    ///
    /// # Errors
    ///
    /// Fails unless the booking is confirmed.
    pub const fn ensure_completable(self) -> Result<(), TransitionError> {
        match self {
            Self::Confirmed => Ok(()),
            other => Err(TransitionError::NotConfirmed(other)),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    /// Nothing paid yet.
    #[default]
    Pending,

    /// Paid in full.
    Completed,

    /// Refunded after cancellation.
    Refunded,

    /// The payment attempt failed.
    Failed,
}

impl PaymentStatus {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who canceled a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanceledBy {
    /// The guest who made the booking.
    Guest,

    /// The owner of the booked property.
    Host,

    /// An administrator.
    Admin,
}

impl CanceledBy {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Host => "host",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for CanceledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refund status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefundStatus {
    /// Owed but not yet paid out.
    #[default]
    Pending,

    /// Paid out.
    Processed,

    /// The payout failed.
    Failed,
}

impl RefundStatus {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Credit card.
    CreditCard,

    /// Debit card.
    DebitCard,

    /// PayPal.
    Paypal,

    /// Stripe checkout.
    Stripe,

    /// Razorpay checkout.
    Razorpay,
}

impl PaymentMethod {
    /// Stable snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
            Self::Stripe => "stripe",
            Self::Razorpay => "razorpay",
        }
    }

    /// Parse a snake-case name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "credit_card" => Some(Self::CreditCard),
            "debit_card" => Some(Self::DebitCard),
            "paypal" => Some(Self::Paypal),
            "stripe" => Some(Self::Stripe),
            "razorpay" => Some(Self::Razorpay),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
