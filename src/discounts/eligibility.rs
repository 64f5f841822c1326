//! Discount eligibility
//!
//! Evaluation never mutates the code; redeeming a code is a separate,
//! explicit step owned by whoever persists the booking.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::DiscountCode,
    ids::{PropertyId, UserId},
};

/// Why a code cannot be applied, in the order the checks are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ineligibility {
    /// The validity window has closed.
    #[error("discount code has expired")]
    Expired,

    /// Every permitted redemption has been used.
    #[error("discount code has reached its usage limit")]
    MaxedOut,

    /// The booking is below the code's minimum amount.
    #[error("booking amount is below the discount minimum")]
    MinimumAmount,

    /// Inactive, not yet valid, or restricted to other users or properties.
    #[error("discount code cannot be applied to this booking")]
    NotApplicable,
}

impl Ineligibility {
    /// Stable reason string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::MaxedOut => "maxed-out",
            Self::MinimumAmount => "minimum-amount",
            Self::NotApplicable => "not-applicable",
        }
    }
}

impl DiscountCode<'_> {
    /// Whether the code may be applied to a booking of `booking_amount` made
    /// by `user` for `property` at `now`.
    pub fn can_apply(
        &self,
        now: Timestamp,
        booking_amount: &Money<'_, Currency>,
        user: Option<UserId>,
        property: Option<PropertyId>,
    ) -> bool {
        self.is_active
            && self.is_within_window(now)
            && !self.is_maxed_out()
            && self.meets_minimum(booking_amount)
            && self.allows_user(user)
            && self.allows_property(property)
    }

    /// Diagnose why [`DiscountCode::can_apply`] would refuse, if it would.
    ///
    /// Reasons are reported in priority order: expired, maxed-out,
    /// minimum-amount, then not-applicable for everything else.
    pub fn ineligibility(
        &self,
        now: Timestamp,
        booking_amount: &Money<'_, Currency>,
        user: Option<UserId>,
        property: Option<PropertyId>,
    ) -> Option<Ineligibility> {
        if self.can_apply(now, booking_amount, user, property) {
            return None;
        }

        let reason = if self.is_expired(now) {
            Ineligibility::Expired
        } else if self.is_maxed_out() {
            Ineligibility::MaxedOut
        } else if !self.meets_minimum(booking_amount) {
            Ineligibility::MinimumAmount
        } else {
            Ineligibility::NotApplicable
        };

        Some(reason)
    }

    /// The validity window closed before `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.valid_until
    }

    /// Every permitted redemption has been used.
    pub fn is_maxed_out(&self) -> bool {
        self.max_uses
            .is_some_and(|max_uses| self.current_uses >= max_uses)
    }

    fn is_within_window(&self, now: Timestamp) -> bool {
        now >= self.valid_from && now <= self.valid_until
    }

    fn meets_minimum(&self, booking_amount: &Money<'_, Currency>) -> bool {
        booking_amount.currency().iso_alpha_code == self.currency().iso_alpha_code
            && booking_amount.amount() >= self.min_booking_amount.amount()
    }

    fn allows_user(&self, user: Option<UserId>) -> bool {
        self.applicable_users.is_empty()
            || user.is_some_and(|user| self.applicable_users.contains(&user))
    }

    fn allows_property(&self, property: Option<PropertyId>) -> bool {
        self.applicable_properties.is_empty()
            || property.is_some_and(|property| self.applicable_properties.contains(&property))
    }
}
