use std::io;

use clap::Args;
use jiff::{SignedDuration, Timestamp, ToSpan, tz::TimeZone};
use lodge::{
    access::Role,
    bookings::PaymentMethod,
    discounts::DiscountValue,
    ids::{PropertyId, UserId},
};
use lodge_app::{
    config::AppConfig,
    context::AppContext,
    domain::{
        bookings::data::{NewBooking, PaymentDetails},
        discounts::data::NewDiscountCode,
        invoices::{InvoiceRenderer, TableInvoiceRenderer},
        properties::models::{Location, Property},
        users::models::User,
    },
};
use rust_decimal::Decimal;
use rusty_money::Money;
use tracing::info;

use super::line_items_table;

#[derive(Debug, Args)]
pub(crate) struct DemoArgs {
    /// Nightly rate of the demo property in major units
    #[arg(long, default_value = "100")]
    nightly_rate: Decimal,

    /// Region of the demo property
    #[arg(long, default_value = "WA")]
    region: String,

    /// Discount code to create and redeem
    #[arg(long, default_value = "WELCOME10")]
    discount_code: String,
}

pub(crate) async fn run(config: &AppConfig, args: DemoArgs) -> Result<(), String> {
    let ctx = AppContext::from_config(config).map_err(|error| error.to_string())?;

    let admin = user(Role::Admin, "Ada", "Admin");
    let host = user(Role::Host, "Hana", "Host");
    let guest = user(Role::Guest, "Gus", "Guest");

    for user in [&admin, &host, &guest] {
        ctx.store.insert_user(user.clone()).await;
    }

    let property = Property {
        id: PropertyId::new(),
        owner: host.id,
        title: "Harbour Cottage".to_string(),
        location: Location {
            address: "1 Quay Street".to_string(),
            city: "Seattle".to_string(),
            state: args.region,
            country: "USA".to_string(),
        },
        nightly_rate: Money::from_decimal(args.nightly_rate, ctx.currency),
        is_active: true,
        is_approved: true,
    };

    ctx.store.insert_property(property.clone()).await;

    let now = Timestamp::now();
    let today = now.to_zoned(TimeZone::UTC).date();

    let code = NewDiscountCode::new(
        DiscountValue::percentage(Decimal::TEN).map_err(|error| error.to_string())?,
        now,
        now.checked_add(SignedDuration::from_hours(24 * 30))
            .map_err(|error| error.to_string())?,
    )
    .with_code(args.discount_code.clone());

    let code = ctx
        .discounts
        .create_code(admin.principal(), code)
        .await
        .map_err(|error| format!("failed to create discount code: {error}"))?;

    info!(code = %code.code, "created discount code");

    let check_in = today
        .checked_add(14.days())
        .map_err(|error| error.to_string())?;
    let check_out = check_in
        .checked_add(3.days())
        .map_err(|error| error.to_string())?;

    let booking = ctx
        .bookings
        .create_booking(
            guest.principal(),
            NewBooking::new(property.id, check_in, check_out, 2)
                .with_discount_code(args.discount_code)
                .with_message("Arriving on the late ferry"),
        )
        .await
        .map_err(|error| format!("failed to create booking: {error}"))?;

    println!("booking_id: {}", booking.id);
    println!("status: {}", booking.status);
    println!("{}", line_items_table(&booking.price.line_items()));

    let payment = PaymentDetails::new(format!("pay_{}", booking.id.into_uuid().simple()))
        .with_method(PaymentMethod::CreditCard);

    let booking = ctx
        .bookings
        .confirm_payment(guest.principal(), booking.id, payment)
        .await
        .map_err(|error| format!("failed to confirm payment: {error}"))?;

    let invoice = ctx
        .bookings
        .invoice(guest.principal(), booking.id)
        .await
        .map_err(|error| format!("failed to build invoice: {error}"))?;

    TableInvoiceRenderer
        .render(&invoice, &mut io::stdout().lock())
        .map_err(|error| format!("failed to render invoice: {error}"))?;

    let canceled = ctx
        .bookings
        .cancel_booking(
            guest.principal(),
            booking.id,
            Some("plans changed".to_string()),
        )
        .await
        .map_err(|error| format!("failed to cancel booking: {error}"))?;

    println!("status: {}", canceled.status);

    if let Some(refund) = canceled.refund_amount() {
        println!("refund_amount: {refund}");
    }

    if let Some(cancellation) = canceled.cancellation {
        println!("days_until_check_in: {}", cancellation.days_until_check_in);
        println!("refund_tier: {}", cancellation.refund_tier.as_str());

        if let Some(status) = cancellation.refund_status {
            println!("refund_status: {status}");
        }
    }

    Ok(())
}

fn user(role: Role, first_name: &str, last_name: &str) -> User {
    User {
        id: UserId::new(),
        role,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.com", first_name.to_ascii_lowercase()),
    }
}
