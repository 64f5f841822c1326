//! Test context for service-level tests.

use std::sync::Arc;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use lodge::{
    access::{Principal, Role},
    ids::{PropertyId, UserId},
    pricing::PriceCalculator,
};
use rusty_money::{Money, iso};

use crate::{
    clock::{Clock, FixedClock},
    domain::{
        bookings::{BookingRepositories, StoreBookingsService},
        discounts::StoreDiscountsService,
        properties::models::{Location, Property},
        users::models::User,
    },
    store::MemoryStore,
};

/// The instant every test starts at.
pub(crate) const NOW: &str = "2026-10-18T12:00:00Z";

pub(crate) struct TestContext {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub admin: User,
    pub host: User,
    pub guest: User,
    pub stranger: User,
    pub property: Property,
    pub bookings: StoreBookingsService,
    pub discounts: StoreDiscountsService,
}

impl TestContext {
    /// A store seeded with one user per role, a stranger, and a bookable
    /// property at 100 USD a night in a 10% tax region.
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(NOW.parse().expect("valid test timestamp")));

        let admin = user(Role::Admin, "Ada", "Admin");
        let host = user(Role::Host, "Hana", "Host");
        let guest = user(Role::Guest, "Gus", "Guest");
        let stranger = user(Role::Guest, "Sam", "Stranger");

        for user in [&admin, &host, &guest, &stranger] {
            store.insert_user(user.clone()).await;
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

        store.insert_property(property.clone()).await;

        let repositories = BookingRepositories {
            properties: store.clone(),
            users: store.clone(),
            discounts: store.clone(),
            bookings: store.clone(),
        };

        Self {
            bookings: StoreBookingsService::new(
                repositories,
                PriceCalculator::standard(iso::USD),
                clock.clone(),
            ),
            discounts: StoreDiscountsService::new(store.clone(), clock.clone(), iso::USD),
            store,
            clock,
            admin,
            host,
            guest,
            stranger,
            property,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Today's date in UTC.
    pub fn today(&self) -> Date {
        self.now().to_zoned(TimeZone::UTC).date()
    }

    pub fn admin(&self) -> Principal {
        self.admin.principal()
    }

    pub fn host(&self) -> Principal {
        self.host.principal()
    }

    pub fn guest(&self) -> Principal {
        self.guest.principal()
    }

    pub fn stranger(&self) -> Principal {
        self.stranger.principal()
    }

    /// Add a second property with its own host.
    pub async fn add_property(&self, state: &str, is_active: bool) -> Property {
        let owner = user(Role::Host, "Otto", "Owner");

        self.store.insert_user(owner.clone()).await;

        let property = Property {
            id: PropertyId::new(),
            owner: owner.id,
            title: "Lake House".to_string(),
            location: Location {
                state: state.to_string(),
                ..self.property.location.clone()
            },
            is_active,
            ..self.property.clone()
        };

        self.store.insert_property(property.clone()).await;

        property
    }
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
