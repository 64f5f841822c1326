//! Lodge
//!
//! Lodge is the pricing and booking core of a vacation-rental platform: itemised
//! stay pricing with regional taxes, administrator-issued discount codes, the
//! booking lifecycle and cancellation refunds.

pub mod access;
pub mod bookings;
pub mod config;
pub mod discounts;
pub mod ids;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod refunds;
pub mod stays;
pub mod taxes;
