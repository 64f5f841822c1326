//! Property Models

use std::fmt;

use lodge::ids::{PropertyId, UserId};
use rusty_money::{Money, iso::Currency};

/// Property Model
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub owner: UserId,
    pub title: String,
    pub location: Location,
    pub nightly_rate: Money<'static, Currency>,
    pub is_active: bool,
    pub is_approved: bool,
}

impl Property {
    /// Listed and approved, so guests may book it.
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.is_approved
    }

    /// Region code used for the tax lookup.
    pub fn region(&self) -> &str {
        &self.location.state
    }
}

/// Location Model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.address, self.city, self.state, self.country
        )
    }
}
