//! Booking services, storage and wiring for the Lodge command-line app.

pub mod clock;
pub mod config;
pub mod context;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod store;

#[cfg(test)]
mod test;
