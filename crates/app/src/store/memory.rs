//! In-memory store
//!
//! Each table sits behind its own lock. Conditional writes hold the write lock
//! across the check and the write, so they are atomic with respect to every
//! other caller of the same table.

use async_trait::async_trait;
use jiff::civil::Date;
use lodge::{
    bookings::BookingStatus,
    discounts::{CodeName, DiscountCode},
    ids::{BookingId, PropertyId, UserId},
};
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    domain::{
        bookings::{BookingsRepository, data::BookingScope, models::Booking},
        discounts::DiscountCodesRepository,
        properties::{PropertiesRepository, models::Property},
        users::{UsersRepository, models::User},
    },
    store::StoreError,
};

/// Process-local implementation of every repository.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<FxHashMap<UserId, User>>,
    properties: RwLock<FxHashMap<PropertyId, Property>>,
    availability: RwLock<FxHashMap<(PropertyId, Date), BookingId>>,
    discounts: RwLock<FxHashMap<CodeName, DiscountCode<'static>>>,
    bookings: RwLock<FxHashMap<BookingId, Booking>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Add or replace a property.
    pub async fn insert_property(&self, property: Property) {
        self.properties.write().await.insert(property.id, property);
    }
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn get_user(&self, user: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&user).cloned())
    }
}

#[async_trait]
impl PropertiesRepository for MemoryStore {
    async fn get_property(&self, property: PropertyId) -> Result<Option<Property>, StoreError> {
        Ok(self.properties.read().await.get(&property).cloned())
    }

    async fn list_owned(&self, owner: UserId) -> Result<Vec<PropertyId>, StoreError> {
        Ok(self
            .properties
            .read()
            .await
            .values()
            .filter(|property| property.owner == owner)
            .map(|property| property.id)
            .collect())
    }

    async fn mark_booked(
        &self,
        property: PropertyId,
        booking: BookingId,
        nights: &[Date],
    ) -> Result<(), StoreError> {
        let mut availability = self.availability.write().await;

        if let Some(date) = nights
            .iter()
            .copied()
            .find(|night| availability.contains_key(&(property, *night)))
        {
            return Err(StoreError::AlreadyBooked { date });
        }

        availability.extend(nights.iter().map(|night| ((property, *night), booking)));

        debug!(%property, %booking, nights = nights.len(), "marked nights booked");

        Ok(())
    }

    async fn release_booked(
        &self,
        property: PropertyId,
        booking: BookingId,
        nights: &[Date],
    ) -> Result<usize, StoreError> {
        let mut availability = self.availability.write().await;

        let mut released = 0;

        for night in nights {
            let key = (property, *night);

            if availability.get(&key) == Some(&booking) {
                availability.remove(&key);
                released += 1;
            }
        }

        debug!(%property, %booking, released, "released booked nights");

        Ok(released)
    }

    async fn booked_nights(
        &self,
        property: PropertyId,
    ) -> Result<Vec<(Date, BookingId)>, StoreError> {
        let mut nights: Vec<(Date, BookingId)> = self
            .availability
            .read()
            .await
            .iter()
            .filter(|((booked, _), _)| *booked == property)
            .map(|((_, night), booking)| (*night, *booking))
            .collect();

        nights.sort_unstable();

        Ok(nights)
    }
}

#[async_trait]
impl DiscountCodesRepository for MemoryStore {
    async fn get_code(&self, code: &CodeName) -> Result<Option<DiscountCode<'static>>, StoreError> {
        Ok(self.discounts.read().await.get(code).cloned())
    }

    async fn list_codes(&self) -> Result<Vec<DiscountCode<'static>>, StoreError> {
        Ok(self.discounts.read().await.values().cloned().collect())
    }

    async fn insert_code(&self, code: DiscountCode<'static>) -> Result<(), StoreError> {
        let mut discounts = self.discounts.write().await;

        if discounts.contains_key(&code.code) {
            return Err(StoreError::AlreadyExists);
        }

        discounts.insert(code.code.clone(), code);

        Ok(())
    }

    async fn replace_code(
        &self,
        original: &CodeName,
        mut code: DiscountCode<'static>,
    ) -> Result<DiscountCode<'static>, StoreError> {
        let mut discounts = self.discounts.write().await;

        if code.code != *original && discounts.contains_key(&code.code) {
            return Err(StoreError::AlreadyExists);
        }

        let previous = discounts.remove(original).ok_or(StoreError::NotFound)?;

        code.current_uses = previous.current_uses;

        discounts.insert(code.code.clone(), code.clone());

        Ok(code)
    }

    async fn delete_code(&self, code: &CodeName) -> Result<bool, StoreError> {
        Ok(self.discounts.write().await.remove(code).is_some())
    }

    async fn increment_usage(
        &self,
        code: &CodeName,
        expected_uses: u32,
    ) -> Result<u32, StoreError> {
        let mut discounts = self.discounts.write().await;

        let discount = discounts.get_mut(code).ok_or(StoreError::NotFound)?;

        if discount.current_uses != expected_uses {
            return Err(StoreError::StaleWrite);
        }

        discount.current_uses = expected_uses.saturating_add(1);

        Ok(discount.current_uses)
    }
}

#[async_trait]
impl BookingsRepository for MemoryStore {
    async fn get_booking(&self, booking: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().await.get(&booking).cloned())
    }

    async fn list_bookings(&self, scope: BookingScope) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.read().await;

        let visible = bookings
            .values()
            .filter(|booking| match &scope {
                BookingScope::All => true,
                BookingScope::Guest(guest) => booking.guest == *guest,
                BookingScope::Properties(properties) => properties.contains(&booking.property),
            })
            .cloned()
            .collect();

        Ok(visible)
    }

    async fn insert_booking(&self, booking: Booking) -> Result<(), StoreError> {
        let mut bookings = self.bookings.write().await;

        if bookings.contains_key(&booking.id) {
            return Err(StoreError::AlreadyExists);
        }

        bookings.insert(booking.id, booking);

        Ok(())
    }

    async fn update_booking(
        &self,
        booking: Booking,
        expected_status: BookingStatus,
    ) -> Result<(), StoreError> {
        let mut bookings = self.bookings.write().await;

        let stored = bookings.get_mut(&booking.id).ok_or(StoreError::NotFound)?;

        if stored.status != expected_status {
            return Err(StoreError::StaleWrite);
        }

        *stored = booking;

        Ok(())
    }
}
