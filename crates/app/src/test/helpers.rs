//! Test Helpers

use jiff::{ToSpan, civil::Date};
use rusty_money::{Money, iso};

use crate::{
    domain::bookings::{
        BookingsService, BookingsServiceError,
        data::{NewBooking, PaymentDetails},
        models::Booking,
    },
    test::TestContext,
};

pub(crate) fn usd(major: i64) -> Money<'static, iso::Currency> {
    Money::from_major(major, iso::USD)
}

/// Check-in `days_ahead` days from today, staying `nights` nights.
pub(crate) fn stay(
    ctx: &TestContext,
    days_ahead: i32,
    nights: i32,
) -> Result<(Date, Date), jiff::Error> {
    let check_in = ctx.today().checked_add(days_ahead.days())?;
    let check_out = check_in.checked_add(nights.days())?;

    Ok((check_in, check_out))
}

/// A guest booking of the seeded property for two guests.
pub(crate) fn new_booking(
    ctx: &TestContext,
    days_ahead: i32,
    nights: i32,
) -> Result<NewBooking, jiff::Error> {
    let (check_in, check_out) = stay(ctx, days_ahead, nights)?;

    Ok(NewBooking::new(ctx.property.id, check_in, check_out, 2))
}

/// Create a booking as the seeded guest.
pub(crate) async fn book(
    ctx: &TestContext,
    days_ahead: i32,
    nights: i32,
) -> Result<Booking, Box<dyn std::error::Error>> {
    let booking = ctx
        .bookings
        .create_booking(ctx.guest(), new_booking(ctx, days_ahead, nights)?)
        .await?;

    Ok(booking)
}

/// Create a booking as the seeded guest and pay for it.
pub(crate) async fn book_and_pay(
    ctx: &TestContext,
    days_ahead: i32,
    nights: i32,
) -> Result<Booking, Box<dyn std::error::Error>> {
    let booking = book(ctx, days_ahead, nights).await?;

    Ok(pay(ctx, &booking).await?)
}

pub(crate) async fn pay(
    ctx: &TestContext,
    booking: &Booking,
) -> Result<Booking, BookingsServiceError> {
    ctx.bookings
        .confirm_payment(ctx.guest(), booking.id, PaymentDetails::new("pay_123"))
        .await
}
