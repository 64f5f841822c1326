//! User Models

use lodge::{
    access::{Principal, Role},
    ids::UserId,
};

/// User Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// The user acting under their own role.
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }

    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
