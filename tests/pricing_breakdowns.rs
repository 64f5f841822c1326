//! Integration tests for stay pricing

use rust_decimal::Decimal;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use lodge::prelude::*;

fn usd(major: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_major(major, USD)
}

#[test]
fn three_nights_without_region_or_discount() -> TestResult {
    let calculator = PriceCalculator::standard(USD);

    let breakdown = calculator.calculate(&PriceRequest::new(usd(100), 3))?;

    assert_eq!(breakdown.room_subtotal(), usd(300));
    assert_eq!(breakdown.cleaning_fee(), usd(50));
    assert_eq!(breakdown.service_fee(), usd(45));
    assert_eq!(breakdown.subtotal_before_tax(), usd(395));
    assert_eq!(breakdown.taxes(), Money::from_minor(3950, USD));
    assert_eq!(breakdown.total(), Money::from_minor(43_450, USD));
    assert_eq!(breakdown.discount_code(), None);

    Ok(())
}

#[test]
fn ten_percent_code_is_taken_off_the_taxed_subtotal() -> TestResult {
    let calculator = PriceCalculator::standard(USD);
    let discount = AppliedDiscount {
        code: Some(CodeName::parse("save10")?),
        value: DiscountValue::percentage(Decimal::TEN)?,
    };

    let breakdown = calculator.calculate(&PriceRequest::new(usd(100), 3).with_discount(discount))?;

    assert_eq!(breakdown.discount_amount(), Money::from_minor(4345, USD));
    assert_eq!(breakdown.total(), Money::from_minor(39_105, USD));
    assert_eq!(breakdown.discount_code().map(CodeName::as_str), Some("SAVE10"));

    Ok(())
}

#[test]
fn oversized_fixed_discount_is_clamped_to_zero_total() -> TestResult {
    let calculator = PriceCalculator::standard(USD);
    let discount = AppliedDiscount::anonymous(DiscountValue::fixed(usd(1000))?);

    let breakdown = calculator.calculate(&PriceRequest::new(usd(100), 3).with_discount(discount))?;

    assert_eq!(breakdown.discount_amount(), Money::from_minor(43_450, USD));
    assert_eq!(breakdown.total(), usd(0));

    Ok(())
}

#[test]
fn new_york_tax_rounds_to_the_cent() -> TestResult {
    let calculator = PriceCalculator::standard(USD);

    let breakdown = calculator.calculate(&PriceRequest::new(usd(100), 3).in_region("ny"))?;

    assert_eq!(breakdown.taxes(), Money::from_minor(3407, USD));
    assert_eq!(breakdown.total(), Money::from_minor(42_907, USD));

    Ok(())
}

#[test]
fn breakdown_components_always_add_up() -> TestResult {
    let calculator = PriceCalculator::standard(USD);
    let regions = [None, Some("CA"), Some("ny"), Some("TX"), Some("fl"), Some("ZZ")];
    let discounts = [
        None,
        Some(DiscountValue::percentage(Decimal::new(125, 1))?),
        Some(DiscountValue::percentage(Decimal::ONE_HUNDRED)?),
        Some(DiscountValue::fixed(Money::from_minor(1999, USD))?),
        Some(DiscountValue::fixed(usd(100_000))?),
    ];

    for rate_minor in [1, 999, 12_345, 45_678] {
        for nights in [1, 2, 7, 30] {
            for region in regions {
                for discount in discounts {
                    let mut request = PriceRequest::new(Money::from_minor(rate_minor, USD), nights);

                    if let Some(region) = region {
                        request = request.in_region(region);
                    }

                    if let Some(value) = discount {
                        request = request.with_discount(AppliedDiscount::anonymous(value));
                    }

                    let breakdown = calculator.calculate(&request)?;

                    let before_tax = *breakdown.room_subtotal().amount()
                        + *breakdown.cleaning_fee().amount()
                        + *breakdown.service_fee().amount();
                    let after_tax = *breakdown.subtotal_before_tax().amount()
                        + *breakdown.taxes().amount();
                    let total = *breakdown.subtotal_after_tax().amount()
                        - *breakdown.discount_amount().amount();

                    assert_eq!(*breakdown.subtotal_before_tax().amount(), before_tax);
                    assert_eq!(*breakdown.subtotal_after_tax().amount(), after_tax);
                    assert_eq!(*breakdown.total().amount(), total);
                    assert!(!breakdown.discount_amount().is_negative());
                    assert!(
                        breakdown.discount_amount().amount()
                            <= breakdown.subtotal_after_tax().amount()
                    );
                    assert!(!breakdown.total().is_negative());
                }
            }
        }
    }

    Ok(())
}

#[test]
fn calculation_is_deterministic() -> TestResult {
    let calculator = PriceCalculator::standard(USD);
    let request = PriceRequest::new(Money::from_minor(18_999, USD), 5)
        .in_region("TX")
        .with_discount(AppliedDiscount::anonymous(DiscountValue::percentage(Decimal::new(15, 0))?));

    let first = calculator.calculate(&request)?;
    let second = calculator.calculate(&request)?;

    assert_eq!(first, second);
    assert_eq!(first.line_items(), second.line_items());

    Ok(())
}

#[test]
fn invalid_requests_are_rejected() {
    let calculator = PriceCalculator::standard(USD);

    assert_eq!(
        calculator.calculate(&PriceRequest::new(usd(0), 3)),
        Err(PriceError::NonPositiveRate)
    );
    assert_eq!(
        calculator.calculate(&PriceRequest::new(usd(-10), 3)),
        Err(PriceError::NonPositiveRate)
    );
    assert_eq!(
        calculator.calculate(&PriceRequest::new(usd(100), 0)),
        Err(PriceError::NoNights)
    );
}
