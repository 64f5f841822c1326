//! Pricing
//!
//! Builds the itemised price of a stay. Every component is rounded to the
//! currency's minor unit before it feeds the next sum, so the total always
//! equals the sum of the printed lines.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    discounts::{AppliedDiscount, CodeName, DiscountValue},
    money::{AmountError, apply_rate, ensure_currency, rounded, sum, zero},
    taxes::TaxTable,
};

/// Flat cleaning fee in major units applied when no other fee is configured.
pub const DEFAULT_CLEANING_FEE: i64 = 50;

/// Errors that can occur while pricing a stay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The nightly rate was zero or negative.
    #[error("nightly rate must be positive")]
    NonPositiveRate,

    /// The stay has no nights.
    #[error("number of nights must be positive")]
    NoNights,

    /// Wrapped arithmetic or currency error.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Input to [`PriceCalculator::calculate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest<'a> {
    /// Price per night.
    pub nightly_rate: Money<'a, Currency>,

    /// Number of nights.
    pub nights: u32,

    /// Region code used for the tax lookup.
    pub region: Option<String>,

    /// Discount to apply to the subtotal after tax.
    pub discount: Option<AppliedDiscount<'a>>,

    /// Whether the flat cleaning fee is charged.
    pub include_cleaning_fee: bool,
}

impl<'a> PriceRequest<'a> {
    /// A request for `nights` at `nightly_rate`, with the cleaning fee and no
    /// region or discount.
    pub fn new(nightly_rate: Money<'a, Currency>, nights: u32) -> Self {
        Self {
            nightly_rate,
            nights,
            region: None,
            discount: None,
            include_cleaning_fee: true,
        }
    }

    /// Set the tax region.
    #[must_use]
    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Apply a discount.
    #[must_use]
    pub fn with_discount(mut self, discount: AppliedDiscount<'a>) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Skip the cleaning fee.
    #[must_use]
    pub fn without_cleaning_fee(mut self) -> Self {
        self.include_cleaning_fee = false;
        self
    }
}

/// Itemised price of a stay.
///
/// Produced only by [`PriceCalculator::calculate`]; a new breakdown is built
/// whenever any input changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown<'a> {
    nightly_rate: Money<'a, Currency>,
    nights: u32,
    room_subtotal: Money<'a, Currency>,
    cleaning_fee: Money<'a, Currency>,
    service_fee: Money<'a, Currency>,
    service_fee_rate: Decimal,
    subtotal_before_tax: Money<'a, Currency>,
    taxes: Money<'a, Currency>,
    subtotal_after_tax: Money<'a, Currency>,
    discount_code: Option<CodeName>,
    discount_amount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> PriceBreakdown<'a> {
    /// Price per night.
    pub fn nightly_rate(&self) -> Money<'a, Currency> {
        self.nightly_rate
    }

    /// Number of nights.
    pub fn nights(&self) -> u32 {
        self.nights
    }

    /// Nightly rate times nights.
    pub fn room_subtotal(&self) -> Money<'a, Currency> {
        self.room_subtotal
    }

    /// Flat cleaning fee, zero when excluded.
    pub fn cleaning_fee(&self) -> Money<'a, Currency> {
        self.cleaning_fee
    }

    /// Service fee charged on the room subtotal.
    pub fn service_fee(&self) -> Money<'a, Currency> {
        self.service_fee
    }

    /// Room subtotal plus cleaning and service fees.
    pub fn subtotal_before_tax(&self) -> Money<'a, Currency> {
        self.subtotal_before_tax
    }

    /// Tax on the subtotal before tax.
    pub fn taxes(&self) -> Money<'a, Currency> {
        self.taxes
    }

    /// Subtotal before tax plus taxes; the base a discount applies to.
    pub fn subtotal_after_tax(&self) -> Money<'a, Currency> {
        self.subtotal_after_tax
    }

    /// Code of the discount that reduced this price, if any.
    pub fn discount_code(&self) -> Option<&CodeName> {
        self.discount_code.as_ref()
    }

    /// Amount taken off the subtotal after tax.
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Amount payable.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency of every amount in the breakdown.
    pub fn currency(&self) -> &'a Currency {
        self.total.currency()
    }

    /// Human-readable itemisation, in display order.
    ///
    /// The discount line is only present when a discount reduced the price.
    pub fn line_items(&self) -> SmallVec<[LineItem; 8]> {
        let mut lines = SmallVec::new();

        lines.push(LineItem::new(
            "Nightly Rate",
            format!("{} x {} nights", self.nightly_rate, self.nights),
        ));
        lines.push(LineItem::new("Room Subtotal", self.room_subtotal.to_string()));
        lines.push(LineItem::new("Cleaning Fee", self.cleaning_fee.to_string()));
        let service_fee_percent = (self.service_fee_rate * Decimal::ONE_HUNDRED).normalize();

        lines.push(LineItem::new(
            format!("Service Fee ({service_fee_percent}%)"),
            self.service_fee.to_string(),
        ));
        lines.push(LineItem::new("Subtotal", self.subtotal_before_tax.to_string()));
        lines.push(LineItem::new("Taxes", self.taxes.to_string()));

        if self.discount_amount.is_positive() {
            lines.push(LineItem::new("Discount", format!("-{}", self.discount_amount)));
        }

        lines.push(LineItem::new("Total", self.total.to_string()));

        lines
    }
}

/// One printable line of a [`PriceBreakdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Line label.
    pub label: String,

    /// Formatted amount.
    pub amount: String,
}

impl LineItem {
    fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: amount.into(),
        }
    }
}

/// Computes [`PriceBreakdown`]s from a fixed fee and tax configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCalculator<'a> {
    currency: &'a Currency,
    cleaning_fee: Money<'a, Currency>,
    service_fee_rate: Decimal,
    taxes: TaxTable,
}

impl<'a> PriceCalculator<'a> {
    /// Calculator with the standard tax table, a 15% service fee and a flat
    /// 50 cleaning fee in `currency`.
    pub fn standard(currency: &'a Currency) -> Self {
        Self {
            currency,
            cleaning_fee: Money::from_major(DEFAULT_CLEANING_FEE, currency),
            service_fee_rate: Decimal::new(15, 2),
            taxes: TaxTable::standard(),
        }
    }

    /// Calculator with explicit fees and tax table.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::CurrencyMismatch`] if the cleaning fee is not in
    /// `currency`.
    pub fn new(
        currency: &'a Currency,
        cleaning_fee: Money<'a, Currency>,
        service_fee_rate: Decimal,
        taxes: TaxTable,
    ) -> Result<Self, AmountError> {
        ensure_currency(currency, &cleaning_fee)?;

        Ok(Self {
            currency,
            cleaning_fee: rounded(*cleaning_fee.amount(), currency),
            service_fee_rate,
            taxes,
        })
    }

    /// Currency every breakdown is produced in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// The tax table in use.
    pub fn taxes(&self) -> &TaxTable {
        &self.taxes
    }

    /// Price a stay.
    ///
    /// # Errors
    ///
    /// - [`PriceError::NonPositiveRate`]: the nightly rate rounds to zero or
    ///   less.
    /// - [`PriceError::NoNights`]: `nights` is zero.
    /// - [`PriceError::Amount`]: a currency mismatch or arithmetic overflow.
    pub fn calculate(
        &self,
        request: &PriceRequest<'a>,
    ) -> Result<PriceBreakdown<'a>, PriceError> {
        ensure_currency(self.currency, &request.nightly_rate)?;

        let nightly_rate = rounded(*request.nightly_rate.amount(), self.currency);

        if !nightly_rate.is_positive() {
            return Err(PriceError::NonPositiveRate);
        }

        if request.nights == 0 {
            return Err(PriceError::NoNights);
        }

        let room_subtotal = apply_rate(&nightly_rate, Decimal::from(request.nights))?;

        let cleaning_fee = if request.include_cleaning_fee {
            self.cleaning_fee
        } else {
            zero(self.currency)
        };

        let service_fee = apply_rate(&room_subtotal, self.service_fee_rate)?;
        let subtotal_before_tax =
            sum(self.currency, &[&room_subtotal, &cleaning_fee, &service_fee])?;

        let tax_rate = self.taxes.rate_for(request.region.as_deref());
        let taxes = apply_rate(&subtotal_before_tax, tax_rate)?;
        let subtotal_after_tax = sum(self.currency, &[&subtotal_before_tax, &taxes])?;

        let (discount_code, discount_amount) = match &request.discount {
            Some(discount) if discount.value.is_positive() => (
                discount.code.clone(),
                self.discount_amount(&discount.value, &subtotal_after_tax)?,
            ),
            _ => (None, zero(self.currency)),
        };

        let total = rounded(
            subtotal_after_tax
                .amount()
                .checked_sub(*discount_amount.amount())
                .ok_or(AmountError::Overflow)?,
            self.currency,
        );

        Ok(PriceBreakdown {
            nightly_rate,
            nights: request.nights,
            room_subtotal,
            cleaning_fee,
            service_fee,
            service_fee_rate: self.service_fee_rate,
            subtotal_before_tax,
            taxes,
            subtotal_after_tax,
            discount_code,
            discount_amount,
            total,
        })
    }

    /// Discount on `base`, clamped so it never exceeds `base`.
    fn discount_amount(
        &self,
        value: &DiscountValue<'a>,
        base: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, AmountError> {
        let amount = match value {
            DiscountValue::Percentage(percent) => {
                apply_rate(base, *percent / Decimal::ONE_HUNDRED)?
            }
            DiscountValue::Fixed(amount) => {
                ensure_currency(self.currency, amount)?;

                rounded(*amount.amount(), self.currency)
            }
        };

        if amount.amount() > base.amount() {
            Ok(*base)
        } else {
            Ok(amount)
        }
    }
}
