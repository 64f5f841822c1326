//! Bookings Repository

use async_trait::async_trait;
use lodge::{bookings::BookingStatus, ids::BookingId};
use mockall::automock;

use crate::{
    domain::bookings::{data::BookingScope, models::Booking},
    store::StoreError,
};

#[automock]
#[async_trait]
pub trait BookingsRepository: Send + Sync {
    /// Look a booking up by id.
    async fn get_booking(&self, booking: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Every booking in `scope`, in no particular order.
    async fn list_bookings(&self, scope: BookingScope) -> Result<Vec<Booking>, StoreError>;

    /// Persist a new booking.
    async fn insert_booking(&self, booking: Booking) -> Result<(), StoreError>;

    /// Overwrite a booking whose stored status is still `expected_status`.
    ///
    /// Fails with [`StoreError::StaleWrite`] if the status has moved on.
    async fn update_booking(
        &self,
        booking: Booking,
        expected_status: BookingStatus,
    ) -> Result<(), StoreError>;
}
