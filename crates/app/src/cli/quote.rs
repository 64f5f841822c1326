use clap::Args;
use lodge::{
    discounts::{AppliedDiscount, DiscountValue},
    pricing::PriceRequest,
};
use lodge_app::config::AppConfig;
use rust_decimal::Decimal;
use rusty_money::Money;

use super::line_items_table;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Price per night in major units
    #[arg(long)]
    nightly_rate: Decimal,

    /// Number of nights
    #[arg(long)]
    nights: u32,

    /// Region code used for the tax lookup
    #[arg(long)]
    region: Option<String>,

    /// Percentage taken off the total
    #[arg(long, conflicts_with = "discount_amount")]
    discount_percent: Option<Decimal>,

    /// Fixed amount taken off the total, in major units
    #[arg(long)]
    discount_amount: Option<Decimal>,

    /// Leave out the cleaning fee
    #[arg(long)]
    no_cleaning_fee: bool,
}

pub(crate) fn run(config: &AppConfig, args: QuoteArgs) -> Result<(), String> {
    let calculator = config
        .pricing()
        .and_then(|pricing| pricing.calculator())
        .map_err(|error| format!("invalid pricing config: {error}"))?;

    let currency = calculator.currency();

    let mut request =
        PriceRequest::new(Money::from_decimal(args.nightly_rate, currency), args.nights);

    if let Some(region) = args.region {
        request = request.in_region(region);
    }

    if args.no_cleaning_fee {
        request = request.without_cleaning_fee();
    }

    let discount = match (args.discount_percent, args.discount_amount) {
        (Some(percent), _) => Some(DiscountValue::percentage(percent)),
        (None, Some(amount)) => Some(DiscountValue::fixed(Money::from_decimal(amount, currency))),
        (None, None) => None,
    };

    if let Some(value) = discount {
        let value = value.map_err(|error| format!("invalid discount: {error}"))?;

        request = request.with_discount(AppliedDiscount::anonymous(value));
    }

    let breakdown = calculator
        .calculate(&request)
        .map_err(|error| format!("failed to price stay: {error}"))?;

    println!("{}", line_items_table(&breakdown.line_items()));

    Ok(())
}
