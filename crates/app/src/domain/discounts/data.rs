//! Discount Catalog Data

use jiff::Timestamp;
use lodge::{
    discounts::DiscountValue,
    ids::{PropertyId, UserId},
};
use rusty_money::{Money, iso::Currency};

/// New Discount Code Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountCode {
    /// Requested code; a random one is generated when omitted.
    pub code: Option<String>,
    pub description: Option<String>,
    pub value: DiscountValue<'static>,
    pub max_uses: Option<u32>,
    pub min_booking_amount: Option<Money<'static, Currency>>,
    pub applicable_properties: Vec<PropertyId>,
    pub applicable_users: Vec<UserId>,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
}

impl NewDiscountCode {
    pub fn new(
        value: DiscountValue<'static>,
        valid_from: Timestamp,
        valid_until: Timestamp,
    ) -> Self {
        Self {
            code: None,
            description: None,
            value,
            max_uses: None,
            min_booking_amount: None,
            applicable_properties: Vec::new(),
            applicable_users: Vec::new(),
            valid_from,
            valid_until,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Discount Code Update Data
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscountCodeUpdate {
    pub code: Option<String>,
    pub description: Option<String>,
    pub value: Option<DiscountValue<'static>>,
    pub max_uses: Option<Option<u32>>,
    pub min_booking_amount: Option<Money<'static, Currency>>,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub is_active: Option<bool>,
}

/// Discount Code Filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscountFilter {
    /// Only codes with this active flag.
    pub is_active: Option<bool>,

    /// Case-insensitive substring of the code.
    pub search: Option<String>,
}

