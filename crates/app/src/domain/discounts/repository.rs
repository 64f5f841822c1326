//! Discount Codes Repository

use async_trait::async_trait;
use lodge::discounts::{CodeName, DiscountCode};
use mockall::automock;

use crate::store::StoreError;

#[automock]
#[async_trait]
pub trait DiscountCodesRepository: Send + Sync {
    /// Look a code up by its normalised name.
    async fn get_code(&self, code: &CodeName) -> Result<Option<DiscountCode<'static>>, StoreError>;

    /// Every code in the catalog.
    async fn list_codes(&self) -> Result<Vec<DiscountCode<'static>>, StoreError>;

    /// Add a code; fails with [`StoreError::AlreadyExists`] on a duplicate name.
    async fn insert_code(&self, code: DiscountCode<'static>) -> Result<(), StoreError>;

    /// Replace the code stored as `original`, possibly under a new name.
    ///
    /// The stored usage counter is kept; only [`increment_usage`] changes it.
    ///
    /// [`increment_usage`]: DiscountCodesRepository::increment_usage
    async fn replace_code(
        &self,
        original: &CodeName,
        code: DiscountCode<'static>,
    ) -> Result<DiscountCode<'static>, StoreError>;

    /// Remove a code. Returns whether it existed.
    async fn delete_code(&self, code: &CodeName) -> Result<bool, StoreError>;

    /// Bump the usage counter if it still equals `expected_uses`.
    ///
    /// Fails with [`StoreError::StaleWrite`] if another redemption got there
    /// first. Returns the new count.
    async fn increment_usage(&self, code: &CodeName, expected_uses: u32) -> Result<u32, StoreError>;
}
