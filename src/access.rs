//! Access
//!
//! One predicate decides who may act on a booking: an administrator, the
//! booking's guest, or the owner of the booked property. Everyone else is
//! turned away.

use std::fmt;

use crate::{bookings::CanceledBy, ids::UserId};

/// Platform role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Books stays.
    #[default]
    Guest,

    /// Lists properties.
    Host,

    /// Operates the platform.
    Admin,
}

impl Role {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Host => "host",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a principal relates to a booking, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    /// Platform administrator.
    Admin,

    /// Owner of the booked property.
    Host,

    /// The guest who made the booking.
    Guest,
}

impl From<Relationship> for CanceledBy {
    fn from(relationship: Relationship) -> Self {
        match relationship {
            Relationship::Admin => Self::Admin,
            Relationship::Host => Self::Host,
            Relationship::Guest => Self::Guest,
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal {
    /// Acting user.
    pub user: UserId,

    /// Their platform role.
    pub role: Role,
}

impl Principal {
    /// A caller acting as `user` with `role`.
    pub const fn new(user: UserId, role: Role) -> Self {
        Self { user, role }
    }

    /// Whether the caller is an administrator.
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether the caller may settle a booking made by `guest`.
    pub fn may_pay_for(&self, guest: UserId) -> bool {
        self.is_admin() || self.user == guest
    }

    /// The caller's relationship to a booking made by `guest` on a property
    /// owned by `owner`, or `None` if they have no standing.
    ///
    /// Administrator beats owner, and owner beats guest, so a host booking
    /// their own property acts as the host.
    pub fn relationship_to(&self, guest: UserId, owner: UserId) -> Option<Relationship> {
        if self.is_admin() {
            Some(Relationship::Admin)
        } else if self.user == owner {
            Some(Relationship::Host)
        } else if self.user == guest {
            Some(Relationship::Guest)
        } else {
            None
        }
    }
}
