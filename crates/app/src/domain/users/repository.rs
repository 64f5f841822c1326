//! Users Repository

use async_trait::async_trait;
use lodge::ids::UserId;
use mockall::automock;

use crate::{domain::users::models::User, store::StoreError};

#[automock]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Look a user up by id.
    async fn get_user(&self, user: UserId) -> Result<Option<User>, StoreError>;
}
