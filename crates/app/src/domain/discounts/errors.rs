//! Discount catalog errors.

use lodge::discounts::{DiscountError, Ineligibility};
use thiserror::Error;

use crate::{errors::ErrorKind, store::StoreError};

#[derive(Debug, Error)]
pub enum DiscountsServiceError {
    #[error("only administrators can manage discount codes")]
    Forbidden,

    #[error("invalid discount code: {0}")]
    Invalid(#[from] DiscountError),

    #[error("discount code already exists")]
    AlreadyExists,

    #[error("discount code not found")]
    NotFound,

    #[error("discount code cannot be used: {0}")]
    Ineligible(Ineligibility),

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl DiscountsServiceError {
    /// Caller-visible category.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden => ErrorKind::Authorization,
            Self::Invalid(_) => ErrorKind::Validation,
            Self::AlreadyExists => ErrorKind::Conflict,
            Self::NotFound => ErrorKind::NotFound,
            Self::Ineligible(_) => ErrorKind::DomainRule,
            Self::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<StoreError> for DiscountsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AlreadyExists => Self::AlreadyExists,
            StoreError::NotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}
