//! End-to-end booking lifecycle through the public application context.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp, civil::date};
use lodge::{
    access::Role,
    bookings::{BookingStatus, PaymentMethod, PaymentStatus, RefundStatus},
    discounts::DiscountValue,
    ids::{PropertyId, UserId},
    pricing::PriceCalculator,
    refunds::RefundTier,
};
use lodge_app::{
    clock::FixedClock,
    context::AppContext,
    domain::{
        bookings::{
            BookingsServiceError,
            data::{NewBooking, PaymentDetails},
        },
        discounts::data::NewDiscountCode,
        invoices::{InvoiceRenderer, TableInvoiceRenderer},
        properties::models::{Location, Property},
        users::models::User,
    },
    errors::ErrorKind,
};
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use testresult::TestResult;

fn user(role: Role, name: &str) -> User {
    User {
        id: UserId::new(),
        role,
        first_name: name.to_string(),
        last_name: "Example".to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
    }
}

#[tokio::test]
async fn book_pay_invoice_and_cancel() -> TestResult {
    let now: Timestamp = "2026-10-18T12:00:00Z".parse()?;
    let clock = Arc::new(FixedClock::new(now));
    let ctx = AppContext::in_memory(PriceCalculator::standard(iso::USD), clock.clone());

    let admin = user(Role::Admin, "Ada");
    let host = user(Role::Host, "Hana");
    let guest = user(Role::Guest, "Gus");

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
            state: "WA".to_string(),
            country: "USA".to_string(),
        },
        nightly_rate: Money::from_major(100, iso::USD),
        is_active: true,
        is_approved: true,
    };

    ctx.store.insert_property(property.clone()).await;

    ctx.discounts
        .create_code(
            admin.principal(),
            NewDiscountCode::new(
                DiscountValue::percentage(Decimal::TEN)?,
                now,
                now.checked_add(SignedDuration::from_hours(24 * 30))?,
            )
            .with_code("SAVE10"),
        )
        .await?;

    let booking = ctx
        .bookings
        .create_booking(
            guest.principal(),
            NewBooking::new(property.id, date(2026, 11, 1), date(2026, 11, 4), 2)
                .with_discount_code("SAVE10")
                .with_message("Arriving after dark"),
        )
        .await?;

    assert_eq!(booking.total(), Money::from_minor(39_105, iso::USD));
    assert_eq!(booking.message.as_deref(), Some("Arriving after dark"));

    let booking = ctx
        .bookings
        .confirm_payment(
            guest.principal(),
            booking.id,
            PaymentDetails::new("pay_1").with_method(PaymentMethod::Stripe),
        )
        .await?;

    assert_eq!(booking.status, BookingStatus::Confirmed);

    let invoice = ctx.bookings.invoice(admin.principal(), booking.id).await?;
    let mut rendered = Vec::new();

    TableInvoiceRenderer.render(&invoice, &mut rendered)?;

    let rendered = String::from_utf8(rendered)?;

    assert!(rendered.contains("Harbour Cottage"));
    assert!(rendered.contains("Payment Method: stripe"));

    // Five days out: half the total comes back.
    clock.set("2026-10-27T09:00:00Z".parse()?);

    let canceled = ctx
        .bookings
        .cancel_booking(guest.principal(), booking.id, None)
        .await?;

    assert_eq!(canceled.refund_amount(), Some(Money::from_minor(19_553, iso::USD)));

    let cancellation = canceled.cancellation.ok_or("cancellation missing")?;

    assert_eq!(canceled.payment_status, PaymentStatus::Completed);
    assert_eq!(cancellation.days_until_check_in, 5);
    assert_eq!(cancellation.refund_tier, RefundTier::Half);
    assert_eq!(cancellation.refund_status, Some(RefundStatus::Pending));

    let again = ctx
        .bookings
        .cancel_booking(host.principal(), booking.id, None)
        .await;

    assert!(
        matches!(&again, Err(error) if error.kind() == ErrorKind::Conflict),
        "expected Conflict, got {again:?}"
    );
    assert!(matches!(again, Err(BookingsServiceError::Transition(_))));

    Ok(())
}
