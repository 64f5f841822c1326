//! Discounts
//!
//! Administrator-issued discount codes and the values they carry. Whether a
//! code may be used for a particular booking is decided by
//! [`DiscountCode::can_apply`], see [`eligibility`].

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    ids::{PropertyId, UserId},
    money::zero,
};

pub mod eligibility;

pub use eligibility::Ineligibility;

/// Shortest permitted discount code.
pub const MIN_CODE_LEN: usize = 3;

/// Longest permitted discount code.
pub const MAX_CODE_LEN: usize = 20;

/// Longest permitted discount description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Errors raised while building or validating discount codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// The code is not 3-20 ASCII letters or digits.
    #[error("discount code must be 3-20 letters or digits, got {0:?}")]
    InvalidCode(String),

    /// Percentage discounts must lie within 0..=100.
    #[error("percentage discount must be between 0 and 100, got {0}")]
    PercentageOutOfRange(Decimal),

    /// Fixed discounts and minimum booking amounts cannot be negative.
    #[error("discount amounts cannot be negative")]
    NegativeAmount,

    /// The validity window ends before it starts.
    #[error("discount validity window ends before it starts")]
    InvalidWindow,

    /// The description is longer than [`MAX_DESCRIPTION_LEN`].
    #[error("discount description exceeds 500 characters")]
    DescriptionTooLong,

    /// The fixed value or minimum amount is in another currency.
    #[error("discount amounts must be in {expected}, found {actual}")]
    CurrencyMismatch {
        /// Currency of the code.
        expected: &'static str,

        /// Currency of the offending amount.
        actual: &'static str,
    },
}

/// Normalised discount code: uppercase ASCII alphanumerics, 3-20 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeName(String);

impl CodeName {
    /// Trim, uppercase and validate a raw code.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidCode`] if the normalised code is the wrong
    /// length or contains anything other than ASCII letters and digits.
    pub fn parse(raw: &str) -> Result<Self, DiscountError> {
        let code = raw.trim().to_ascii_uppercase();

        let valid_len = (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len());

        if valid_len && code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(code))
        } else {
            Err(DiscountError::InvalidCode(raw.to_string()))
        }
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// A percentage of the subtotal after tax.
    Percentage,

    /// A fixed amount off.
    Fixed,
}

impl DiscountKind {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

/// The reduction a discount grants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountValue<'a> {
    /// Percent of the subtotal after tax, e.g. `10` for 10%.
    Percentage(Decimal),

    /// Fixed amount off the subtotal after tax.
    Fixed(Money<'a, Currency>),
}

impl<'a> DiscountValue<'a> {
    /// Validated percentage discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentageOutOfRange`] outside 0..=100.
    pub fn percentage(value: Decimal) -> Result<Self, DiscountError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(DiscountError::PercentageOutOfRange(value));
        }

        Ok(Self::Percentage(value))
    }

    /// Validated fixed-amount discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::NegativeAmount`] for negative amounts.
    pub fn fixed(amount: Money<'a, Currency>) -> Result<Self, DiscountError> {
        if amount.is_negative() {
            return Err(DiscountError::NegativeAmount);
        }

        Ok(Self::Fixed(amount))
    }

    /// The discount kind.
    pub const fn kind(&self) -> DiscountKind {
        match self {
            Self::Percentage(_) => DiscountKind::Percentage,
            Self::Fixed(_) => DiscountKind::Fixed,
        }
    }

    /// Whether the discount would reduce a price at all.
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Percentage(percent) => percent.is_sign_positive() && !percent.is_zero(),
            Self::Fixed(amount) => amount.is_positive(),
        }
    }
}

impl fmt::Display for DiscountValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(percent) => write!(f, "{percent}%"),
            Self::Fixed(amount) => write!(f, "{amount}"),
        }
    }
}

/// A discount as handed to the price calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDiscount<'a> {
    /// Code recorded on the breakdown, if any.
    pub code: Option<CodeName>,

    /// Reduction to apply.
    pub value: DiscountValue<'a>,
}

impl<'a> AppliedDiscount<'a> {
    /// A discount not tied to a catalogue code.
    pub fn anonymous(value: DiscountValue<'a>) -> Self {
        Self { code: None, value }
    }
}

/// Public-facing summary of a discount code.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountDescription<'a> {
    /// The code.
    pub code: CodeName,

    /// Percentage or fixed.
    pub kind: DiscountKind,

    /// The reduction granted.
    pub value: DiscountValue<'a>,

    /// Free-form administrator description.
    pub description: Option<String>,
}

/// An administrator-issued discount code.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCode<'a> {
    /// Unique code.
    pub code: CodeName,

    /// Optional description shown to guests.
    pub description: Option<String>,

    /// Reduction granted.
    pub value: DiscountValue<'a>,

    /// Maximum redemptions; `None` is unlimited.
    pub max_uses: Option<u32>,

    /// Redemptions so far. Only ever incremented.
    pub current_uses: u32,

    /// Smallest undiscounted total the code applies to.
    pub min_booking_amount: Money<'a, Currency>,

    /// Properties the code is limited to; empty applies to all.
    pub applicable_properties: SmallVec<[PropertyId; 4]>,

    /// Users the code is limited to; empty applies to all.
    pub applicable_users: SmallVec<[UserId; 4]>,

    /// Start of the validity window (inclusive).
    pub valid_from: Timestamp,

    /// End of the validity window (inclusive).
    pub valid_until: Timestamp,

    /// Inactive codes are never eligible.
    pub is_active: bool,

    /// When the code was added to the catalog.
    pub created_at: Timestamp,
}

impl<'a> DiscountCode<'a> {
    /// Create an active, unlimited code with no minimum and no allow-lists,
    /// stamped as created at `valid_from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is inverted or a fixed value is in a
    /// currency other than `currency`.
    pub fn new(
        code: CodeName,
        value: DiscountValue<'a>,
        valid_from: Timestamp,
        valid_until: Timestamp,
        currency: &'a Currency,
    ) -> Result<Self, DiscountError> {
        let discount = Self {
            code,
            description: None,
            value,
            max_uses: None,
            current_uses: 0,
            min_booking_amount: zero(currency),
            applicable_properties: SmallVec::new(),
            applicable_users: SmallVec::new(),
            valid_from,
            valid_until,
            is_active: true,
            created_at: valid_from,
        };

        discount.validate()?;

        Ok(discount)
    }

    /// Set the redemption cap.
    #[must_use]
    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    /// Set the minimum booking amount.
    #[must_use]
    pub fn with_min_booking_amount(mut self, amount: Money<'a, Currency>) -> Self {
        self.min_booking_amount = amount;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Limit the code to the given properties.
    #[must_use]
    pub fn for_properties(mut self, properties: impl IntoIterator<Item = PropertyId>) -> Self {
        self.applicable_properties = properties.into_iter().collect();
        self
    }

    /// Limit the code to the given users.
    #[must_use]
    pub fn for_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.applicable_users = users.into_iter().collect();
        self
    }

    /// Currency the code's amounts are denominated in.
    pub fn currency(&self) -> &'a Currency {
        self.min_booking_amount.currency()
    }

    /// Check the invariants an administrator-supplied code must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), DiscountError> {
        if self.valid_until < self.valid_from {
            return Err(DiscountError::InvalidWindow);
        }

        if self
            .description
            .as_ref()
            .is_some_and(|description| description.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(DiscountError::DescriptionTooLong);
        }

        if self.min_booking_amount.is_negative() {
            return Err(DiscountError::NegativeAmount);
        }

        match self.value {
            DiscountValue::Percentage(percent) => {
                DiscountValue::percentage(percent)?;
            }
            DiscountValue::Fixed(amount) => {
                DiscountValue::fixed(amount)?;

                let expected = self.currency().iso_alpha_code;
                let actual = amount.currency().iso_alpha_code;

                if expected != actual {
                    return Err(DiscountError::CurrencyMismatch { expected, actual });
                }
            }
        }

        Ok(())
    }

    /// Summary exposed to guests looking a code up.
    pub fn describe(&self) -> DiscountDescription<'a> {
        DiscountDescription {
            code: self.code.clone(),
            kind: self.value.kind(),
            value: self.value,
            description: self.description.clone(),
        }
    }

    /// The discount in the form the price calculator takes.
    pub fn as_applied(&self) -> AppliedDiscount<'a> {
        AppliedDiscount {
            code: Some(self.code.clone()),
            value: self.value,
        }
    }
}
