//! Discount Catalog

pub mod data;
pub mod errors;
mod repository;
pub mod service;

pub use errors::DiscountsServiceError;
pub use repository::*;
pub use service::*;
