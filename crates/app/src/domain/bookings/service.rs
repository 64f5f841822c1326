//! Bookings Service
//!
//! Availability and discount usage are claimed with conditional writes, so two
//! requests racing for the same nights or the last redemption of a code cannot
//! both succeed.

use std::{cmp::Reverse, fmt, sync::Arc};

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date};
use lodge::{
    access::{Principal, Relationship, Role},
    bookings::{BookingStatus, CanceledBy, PaymentStatus, RefundStatus},
    discounts::{CodeName, DiscountCode},
    ids::{BookingId, PropertyId, UserId},
    pricing::{PriceBreakdown, PriceCalculator, PriceRequest},
    refunds::refund_for,
    stays::Stay,
};
use mockall::automock;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{Span, info, warn};

use crate::{
    clock::Clock,
    domain::{
        bookings::{
            BookingsRepository, BookingsServiceError,
            data::{BookingScope, NewBooking, PaymentDetails, QuoteRequest},
            models::{Booking, Cancellation, PaymentInfo},
        },
        discounts::DiscountCodesRepository,
        invoices::{
            InvoiceData,
            models::{InvoiceCustomer, InvoicePayment, InvoiceProperty, InvoiceStay},
        },
        properties::{PropertiesRepository, models::Property},
        users::UsersRepository,
    },
    store::StoreError,
};

const MAX_REDEEM_ATTEMPTS: usize = 3;

/// Repositories the booking service reads and writes.
#[derive(Clone)]
pub struct BookingRepositories {
    pub properties: Arc<dyn PropertiesRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub discounts: Arc<dyn DiscountCodesRepository>,
    pub bookings: Arc<dyn BookingsRepository>,
}

impl fmt::Debug for BookingRepositories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingRepositories").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct StoreBookingsService {
    repositories: BookingRepositories,
    calculator: PriceCalculator<'static>,
    clock: Arc<dyn Clock>,
}

/// A priced stay, before anything is persisted.
struct PricedStay {
    property: Property,
    stay: Stay,
    price: PriceBreakdown<'static>,
    discount: Option<DiscountCode<'static>>,
    undiscounted: Money<'static, Currency>,
}

impl StoreBookingsService {
    #[must_use]
    pub fn new(
        repositories: BookingRepositories,
        calculator: PriceCalculator<'static>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repositories,
            calculator,
            clock,
        }
    }

    async fn property(&self, property: PropertyId) -> Result<Property, BookingsServiceError> {
        self.repositories
            .properties
            .get_property(property)
            .await?
            .ok_or(BookingsServiceError::PropertyNotFound)
    }

    async fn booking(&self, booking: BookingId) -> Result<Booking, BookingsServiceError> {
        self.repositories
            .bookings
            .get_booking(booking)
            .await?
            .ok_or(BookingsServiceError::BookingNotFound)
    }

    /// Load a booking and its property, and check the caller may act on it.
    async fn authorized(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<(Booking, Property, Relationship), BookingsServiceError> {
        let booking = self.booking(booking).await?;
        let property = self.property(booking.property).await?;

        let relationship = principal
            .relationship_to(booking.guest, property.owner)
            .ok_or(BookingsServiceError::Forbidden)?;

        Ok((booking, property, relationship))
    }

    async fn price(
        &self,
        request: &QuoteRequest,
        guest: UserId,
        now: Timestamp,
    ) -> Result<PricedStay, BookingsServiceError> {
        let stay = Stay::new(request.check_in, request.check_out)?;

        if !stay.starts_after(now)? {
            return Err(BookingsServiceError::CheckInNotInFuture);
        }

        let property = self.property(request.property).await?;

        if !property.is_bookable() {
            return Err(BookingsServiceError::PropertyUnavailable);
        }

        let base =
            PriceRequest::new(property.nightly_rate, stay.nights()).in_region(property.region());
        let undiscounted = self.calculator.calculate(&base)?;

        let Some(raw_code) = request.discount_code.as_deref() else {
            return Ok(PricedStay {
                undiscounted: undiscounted.subtotal_after_tax(),
                price: undiscounted,
                property,
                stay,
                discount: None,
            });
        };

        let code = CodeName::parse(raw_code)?;

        let discount = self
            .repositories
            .discounts
            .get_code(&code)
            .await?
            .filter(|discount| discount.is_active)
            .ok_or(BookingsServiceError::DiscountNotFound)?;

        let subtotal = undiscounted.subtotal_after_tax();

        if let Some(reason) =
            discount.ineligibility(now, &subtotal, Some(guest), Some(property.id))
        {
            return Err(BookingsServiceError::DiscountIneligible(reason));
        }

        let price = self
            .calculator
            .calculate(&base.with_discount(discount.as_applied()))?;

        Ok(PricedStay {
            property,
            stay,
            price,
            discount: Some(discount),
            undiscounted: subtotal,
        })
    }

    /// Consume one use of `discount`, re-checking eligibility whenever another
    /// redemption wins the race.
    async fn redeem(
        &self,
        mut discount: DiscountCode<'static>,
        amount: &Money<'static, Currency>,
        guest: UserId,
        property: PropertyId,
        now: Timestamp,
    ) -> Result<(), BookingsServiceError> {
        for _ in 0..MAX_REDEEM_ATTEMPTS {
            match self
                .repositories
                .discounts
                .increment_usage(&discount.code, discount.current_uses)
                .await
            {
                Ok(_) => return Ok(()),
                Err(StoreError::StaleWrite) => {
                    discount = self
                        .repositories
                        .discounts
                        .get_code(&discount.code)
                        .await?
                        .ok_or(BookingsServiceError::DiscountNotFound)?;

                    if let Some(reason) =
                        discount.ineligibility(now, amount, Some(guest), Some(property))
                    {
                        return Err(BookingsServiceError::DiscountIneligible(reason));
                    }
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(BookingsServiceError::ConcurrentModification)
    }

    /// Give back nights claimed by a booking that is not going to be stored.
    async fn release_claim(&self, property: PropertyId, booking: BookingId, nights: &[Date]) {
        match self
            .repositories
            .properties
            .release_booked(property, booking, nights)
            .await
        {
            Ok(released) => {
                warn!(%booking, %property, released, "released availability after failed booking");
            }
            Err(error) => {
                warn!(
                    %booking,
                    %property,
                    %error,
                    "failed to release availability after failed booking"
                );
            }
        }
    }
}

#[async_trait]
impl BookingsService for StoreBookingsService {
    #[tracing::instrument(
        name = "bookings.service.quote",
        skip(self, request),
        fields(actor = %principal.user, property = %request.property),
        err
    )]
    async fn quote(
        &self,
        principal: Principal,
        request: QuoteRequest,
    ) -> Result<PriceBreakdown<'static>, BookingsServiceError> {
        let priced = self.price(&request, principal.user, self.clock.now()).await?;

        Ok(priced.price)
    }

    #[tracing::instrument(
        name = "bookings.service.create_booking",
        skip(self, booking),
        fields(
            actor = %principal.user,
            property = %booking.property,
            booking = tracing::field::Empty,
            nights = tracing::field::Empty,
            discount_code = tracing::field::Empty
        ),
        err
    )]
    async fn create_booking(
        &self,
        principal: Principal,
        booking: NewBooking,
    ) -> Result<Booking, BookingsServiceError> {
        if booking.guests == 0 {
            return Err(BookingsServiceError::NoGuests);
        }

        let now = self.clock.now();
        let priced = self.price(&QuoteRequest::from(&booking), principal.user, now).await?;

        let id = BookingId::new();
        let nights: SmallVec<[Date; 16]> = priced.stay.nights_iter().collect();

        let span = Span::current();

        span.record("booking", tracing::field::display(id));
        span.record("nights", priced.stay.nights());

        self.repositories
            .properties
            .mark_booked(priced.property.id, id, &nights)
            .await?;

        if let Some(discount) = priced.discount.filter(|_| priced.price.discount_code().is_some()) {
            span.record("discount_code", tracing::field::display(&discount.code));

            if let Err(error) = self
                .redeem(discount, &priced.undiscounted, principal.user, priced.property.id, now)
                .await
            {
                self.release_claim(priced.property.id, id, &nights).await;

                return Err(error);
            }
        }

        let created = Booking {
            id,
            property: priced.property.id,
            guest: principal.user,
            stay: priced.stay,
            guests: booking.guests,
            price: priced.price,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment: None,
            invoice_number: None,
            message: booking.message,
            special_requests: booking.special_requests,
            cancellation: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(error) = self.repositories.bookings.insert_booking(created.clone()).await {
            self.release_claim(created.property, id, &nights).await;

            return Err(error.into());
        }

        info!(booking = %id, total = %created.total(), "created booking");

        Ok(created)
    }

    #[tracing::instrument(
        name = "bookings.service.get_booking",
        skip(self),
        fields(actor = %principal.user, booking = %booking),
        err
    )]
    async fn get_booking(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<Booking, BookingsServiceError> {
        let (booking, _, _) = self.authorized(principal, booking).await?;

        Ok(booking)
    }

    #[tracing::instrument(
        name = "bookings.service.list_bookings",
        skip(self),
        fields(actor = %principal.user, role = %principal.role),
        err
    )]
    async fn list_bookings(
        &self,
        principal: Principal,
    ) -> Result<Vec<Booking>, BookingsServiceError> {
        let scope = match principal.role {
            Role::Admin => BookingScope::All,
            Role::Host => BookingScope::Properties(
                self.repositories
                    .properties
                    .list_owned(principal.user)
                    .await?,
            ),
            Role::Guest => BookingScope::Guest(principal.user),
        };

        let mut bookings = self.repositories.bookings.list_bookings(scope).await?;

        bookings.sort_by_key(|booking| Reverse((booking.created_at, booking.id)));

        Ok(bookings)
    }

    #[tracing::instrument(
        name = "bookings.service.confirm_payment",
        skip(self, payment),
        fields(actor = %principal.user, booking = %booking),
        err
    )]
    async fn confirm_payment(
        &self,
        principal: Principal,
        booking: BookingId,
        payment: PaymentDetails,
    ) -> Result<Booking, BookingsServiceError> {
        let (mut booking, ..) = self.authorized(principal, booking).await?;

        if !principal.may_pay_for(booking.guest) {
            return Err(BookingsServiceError::Forbidden);
        }

        if payment.id.trim().is_empty() {
            return Err(BookingsServiceError::MissingPaymentId);
        }

        let expected = booking.status;

        expected.ensure_payable()?;

        let now = self.clock.now();

        booking.status = BookingStatus::Confirmed;
        booking.payment_status = PaymentStatus::Completed;
        booking.invoice_number = Some(invoice_number(now, booking.id));
        booking.payment = Some(PaymentInfo {
            id: payment.id,
            status: PaymentStatus::Completed,
            method: payment.method,
            transaction_id: payment.transaction_id,
            last4_digits: payment.last4_digits,
            paid_at: now,
        });
        booking.updated_at = now;

        self.repositories
            .bookings
            .update_booking(booking.clone(), expected)
            .await?;

        info!(booking = %booking.id, "confirmed booking payment");

        Ok(booking)
    }

    #[tracing::instrument(
        name = "bookings.service.cancel_booking",
        skip(self, reason),
        fields(
            actor = %principal.user,
            booking = %booking,
            canceled_by = tracing::field::Empty,
            refund = tracing::field::Empty
        ),
        err
    )]
    async fn cancel_booking(
        &self,
        principal: Principal,
        booking: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, BookingsServiceError> {
        let (mut booking, _, relationship) = self.authorized(principal, booking).await?;

        let expected = booking.status;

        expected.ensure_cancellable()?;

        let now = self.clock.now();
        let refund = refund_for(now, booking.stay.check_in(), &booking.total())?;

        let refund_status = (booking.payment_status == PaymentStatus::Completed
            && refund.amount.is_positive())
        .then_some(RefundStatus::Pending);

        let span = Span::current();

        span.record("canceled_by", CanceledBy::from(relationship).as_str());
        span.record("refund", tracing::field::display(refund.amount));

        booking.status = BookingStatus::Canceled;
        booking.cancellation = Some(Cancellation {
            canceled_by: relationship.into(),
            reason,
            days_until_check_in: refund.days_until_check_in,
            refund_tier: refund.tier,
            refund_amount: refund.amount,
            refund_status,
            canceled_at: now,
        });
        booking.updated_at = now;

        self.repositories
            .bookings
            .update_booking(booking.clone(), expected)
            .await?;

        let nights: SmallVec<[Date; 16]> = booking.stay.nights_iter().collect();

        let released = self
            .repositories
            .properties
            .release_booked(booking.property, booking.id, &nights)
            .await?;

        info!(booking = %booking.id, released, "canceled booking");

        Ok(booking)
    }

    #[tracing::instrument(
        name = "bookings.service.complete_booking",
        skip(self),
        fields(actor = %principal.user, booking = %booking),
        err
    )]
    async fn complete_booking(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<Booking, BookingsServiceError> {
        let (mut booking, _, relationship) = self.authorized(principal, booking).await?;

        if relationship == Relationship::Guest {
            return Err(BookingsServiceError::Forbidden);
        }

        let expected = booking.status;

        expected.ensure_completable()?;

        let now = self.clock.now();

        if !booking.stay.has_ended(now)? {
            return Err(BookingsServiceError::StayNotOver);
        }

        booking.status = BookingStatus::Completed;
        booking.updated_at = now;

        self.repositories
            .bookings
            .update_booking(booking.clone(), expected)
            .await?;

        info!(booking = %booking.id, "completed booking");

        Ok(booking)
    }

    #[tracing::instrument(
        name = "bookings.service.invoice",
        skip(self),
        fields(actor = %principal.user, booking = %booking),
        err
    )]
    async fn invoice(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<InvoiceData, BookingsServiceError> {
        let (booking, property, _) = self.authorized(principal, booking).await?;

        if booking.payment_status != PaymentStatus::Completed {
            return Err(BookingsServiceError::NotPaid);
        }

        let guest = self
            .repositories
            .users
            .get_user(booking.guest)
            .await?
            .ok_or(BookingsServiceError::UserNotFound)?;

        let host = self
            .repositories
            .users
            .get_user(property.owner)
            .await?
            .ok_or(BookingsServiceError::UserNotFound)?;

        Ok(InvoiceData {
            invoice_number: booking
                .invoice_number
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            issued_at: self.clock.now(),
            customer: InvoiceCustomer {
                name: guest.full_name(),
                email: guest.email,
            },
            property: InvoiceProperty {
                title: property.title,
                location: property.location.to_string(),
                host_name: host.full_name(),
            },
            stay: InvoiceStay {
                booking: booking.id,
                check_in: booking.stay.check_in(),
                check_out: booking.stay.check_out(),
                nights: booking.stay.nights(),
                guests: booking.guests,
            },
            line_items: booking.price.line_items(),
            total: booking.total(),
            payment: InvoicePayment {
                status: booking.payment_status,
                method: booking.payment.as_ref().and_then(|payment| payment.method),
                id: booking.payment.map(|payment| payment.id),
            },
        })
    }
}

/// Unique per booking: the payment time followed by the booking id.
fn invoice_number(paid_at: Timestamp, booking: BookingId) -> String {
    format!(
        "INV-{}-{}",
        paid_at.as_millisecond(),
        booking.into_uuid().simple()
    )
    .to_ascii_uppercase()
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Price a prospective stay without side effects.
    async fn quote(
        &self,
        principal: Principal,
        request: QuoteRequest,
    ) -> Result<PriceBreakdown<'static>, BookingsServiceError>;

    /// Book a stay for the caller.
    async fn create_booking(
        &self,
        principal: Principal,
        booking: NewBooking,
    ) -> Result<Booking, BookingsServiceError>;

    /// Retrieve a single booking.
    async fn get_booking(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<Booking, BookingsServiceError>;

    /// Bookings visible to the caller, newest first.
    async fn list_bookings(
        &self,
        principal: Principal,
    ) -> Result<Vec<Booking>, BookingsServiceError>;

    /// Record payment for a pending booking.
    async fn confirm_payment(
        &self,
        principal: Principal,
        booking: BookingId,
        payment: PaymentDetails,
    ) -> Result<Booking, BookingsServiceError>;

    /// Cancel a pending or confirmed booking and compute its refund.
    async fn cancel_booking(
        &self,
        principal: Principal,
        booking: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, BookingsServiceError>;

    /// Mark a confirmed booking completed once its stay is over.
    async fn complete_booking(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<Booking, BookingsServiceError>;

    /// Invoice data for a paid booking.
    async fn invoice(
        &self,
        principal: Principal,
        booking: BookingId,
    ) -> Result<InvoiceData, BookingsServiceError>;
}
