//! Storage

use jiff::civil::Date;
use thiserror::Error;

mod memory;

pub use memory::MemoryStore;

/// Errors reported by repositories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A night in the requested range is already held by another booking.
    #[error("{date} is already booked")]
    AlreadyBooked {
        /// First conflicting night.
        date: Date,
    },

    /// A record with the same key exists.
    #[error("record already exists")]
    AlreadyExists,

    /// The record to update does not exist.
    #[error("record not found")]
    NotFound,

    /// A conditional write saw a different version than expected.
    #[error("record was modified concurrently")]
    StaleWrite,

    /// The backing store failed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
