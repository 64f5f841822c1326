use clap::Args;
use jiff::{Timestamp, civil::Date};
use lodge::refunds::refund_for;
use rust_decimal::Decimal;
use rusty_money::{Money, iso};

#[derive(Debug, Args)]
pub(crate) struct RefundArgs {
    /// Booking total in major units
    #[arg(long)]
    total: Decimal,

    /// ISO 4217 currency of the total
    #[arg(long, default_value = "USD")]
    currency: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    check_in: Date,

    /// Cancellation time; defaults to now
    #[arg(long)]
    now: Option<Timestamp>,
}

pub(crate) fn run(args: RefundArgs) -> Result<(), String> {
    let currency = iso::find(&args.currency.to_ascii_uppercase())
        .ok_or_else(|| format!("unknown currency code: {}", args.currency))?;

    let total = Money::from_decimal(args.total, currency);
    let now = args.now.unwrap_or_else(Timestamp::now);

    let refund = refund_for(now, args.check_in, &total)
        .map_err(|error| format!("failed to compute refund: {error}"))?;

    println!("days_until_check_in: {}", refund.days_until_check_in);
    println!("refund_tier: {}", refund.tier.as_str());
    println!("refund_amount: {}", refund.amount);

    Ok(())
}
