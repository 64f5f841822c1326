//! Properties Repository
//!
//! Availability is a ledger of `(property, night)` pairs, each owned by the
//! booking that claimed it.

use async_trait::async_trait;
use jiff::civil::Date;
use lodge::ids::{BookingId, PropertyId, UserId};
use mockall::automock;

use crate::{domain::properties::models::Property, store::StoreError};

#[automock]
#[async_trait]
pub trait PropertiesRepository: Send + Sync {
    /// Look a property up by id.
    async fn get_property(&self, property: PropertyId) -> Result<Option<Property>, StoreError>;

    /// Ids of every property owned by `owner`.
    async fn list_owned(&self, owner: UserId) -> Result<Vec<PropertyId>, StoreError>;

    /// Claim every night for `booking`, or none of them.
    ///
    /// Fails with [`StoreError::AlreadyBooked`] naming the first night already
    /// held by any booking.
    async fn mark_booked(
        &self,
        property: PropertyId,
        booking: BookingId,
        nights: &[Date],
    ) -> Result<(), StoreError>;

    /// Release the nights held by `booking`; nights held by other bookings are
    /// left alone. Returns how many nights were released.
    async fn release_booked(
        &self,
        property: PropertyId,
        booking: BookingId,
        nights: &[Date],
    ) -> Result<usize, StoreError>;

    /// Every booked night of a property, in date order.
    async fn booked_nights(&self, property: PropertyId)
    -> Result<Vec<(Date, BookingId)>, StoreError>;
}
