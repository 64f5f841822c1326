//! Lodge Domain Concerns

pub mod bookings;
pub mod discounts;
pub mod invoices;
pub mod properties;
pub mod users;
